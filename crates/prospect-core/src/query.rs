//! Filtering, sorting, and pagination over a partition snapshot.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Optional, AND-combined record filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// Case-insensitive substring match against name, phone, email,
    /// and category.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact area match, with `city` as the record-side fallback.
    pub area: Option<String>,
    /// Require (or forbid) a non-blank website.
    pub has_website: Option<bool>,
    /// Minimum parseable rating; records without a rating are excluded.
    pub min_rating: Option<f64>,
    /// When set, keep only records missing at least one of phone,
    /// email, or website.
    pub incomplete_contact: bool,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Sort specification: a field name plus direction. Rating and review
/// counts compare numerically, everything else case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// One page of query results.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPage {
    /// Records on this page.
    pub rows: Vec<Record>,
    /// Total matching records across all pages.
    pub total: usize,
    /// 1-indexed page number as requested.
    pub page: usize,
    /// Page size as applied.
    pub page_size: usize,
    /// Total number of pages.
    pub total_pages: usize,
}

/// Apply filters to a snapshot, preserving store order.
pub fn filter_records<'a>(records: &'a [Record], filters: &Filters) -> Vec<&'a Record> {
    records.iter().filter(|r| matches(r, filters)).collect()
}

fn matches(record: &Record, filters: &Filters) -> bool {
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let haystacks = [
            record.name(),
            record.get_nonempty("phone").unwrap_or(""),
            record.get_nonempty("email").unwrap_or(""),
            record.get_nonempty("category").unwrap_or(""),
        ];
        if !haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    if let Some(category) = filters.category.as_deref().filter(|c| !c.is_empty()) {
        if record.get_nonempty("category") != Some(category) {
            return false;
        }
    }

    if let Some(area) = filters.area.as_deref().filter(|a| !a.is_empty()) {
        if record.locality() != area {
            return false;
        }
    }

    if let Some(wants_website) = filters.has_website {
        if record.has_website() != wants_website {
            return false;
        }
    }

    if let Some(min_rating) = filters.min_rating {
        match record.rating() {
            Some(rating) if rating >= min_rating => {}
            _ => return false,
        }
    }

    if filters.incomplete_contact && !record.has_incomplete_contact() {
        return false;
    }

    true
}

fn compare(a: &Record, b: &Record, field: &str) -> Ordering {
    match field {
        "rating" => {
            let a = a.rating().unwrap_or(0.0);
            let b = b.rating().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        "reviews_count" => a
            .reviews_count()
            .partial_cmp(&b.reviews_count())
            .unwrap_or(Ordering::Equal),
        _ => {
            let a = a.get_nonempty(field).unwrap_or("").to_lowercase();
            let b = b.get_nonempty(field).unwrap_or("").to_lowercase();
            a.cmp(&b)
        }
    }
}

/// Filter, sort, and paginate a partition snapshot.
///
/// Pages are 1-indexed; an out-of-range page yields an empty `rows`
/// slice with correct totals, never an error. The sort is stable, so
/// equal keys keep their store order.
pub fn query(
    records: &[Record],
    filters: &Filters,
    sort: Option<&Sort>,
    page: usize,
    page_size: usize,
) -> QueryPage {
    let mut matched = filter_records(records, filters);

    if let Some(sort) = sort {
        matched.sort_by(|a, b| {
            let ordering = compare(a, b, &sort.field);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = matched.len();
    let total_pages = total.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let rows = if start >= total {
        Vec::new()
    } else {
        matched[start..(start + page_size).min(total)]
            .iter()
            .map(|r| (*r).clone())
            .collect()
    };

    QueryPage {
        rows,
        total,
        page,
        page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;

    fn sample() -> Vec<Record> {
        vec![
            record(&[
                ("business_name", "Acme Plumbing"),
                ("category", "Plumber"),
                ("area", "North"),
                ("phone", "111"),
                ("email", "acme@x.com"),
                ("website", "acme.com"),
                ("rating", "4.5"),
                ("reviews_count", "10"),
            ]),
            record(&[
                ("business_name", "Bolt Electric"),
                ("category", "Electrician"),
                ("city", "Austin"),
                ("phone", "222"),
                ("website", "bolt.com"),
                ("rating", "3.9"),
                ("reviews_count", "2"),
            ]),
            record(&[
                ("business_name", "Crown Roofing"),
                ("category", "Roofer"),
                ("area", "North"),
                ("reviews_count", "100"),
            ]),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = sample();
        let filters = Filters {
            search: Some("bolt".to_string()),
            ..Default::default()
        };
        let matched = filter_records(&records, &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name(), "Bolt Electric");
    }

    #[test]
    fn test_area_filter_uses_city_fallback() {
        let records = sample();
        let filters = Filters {
            area: Some("Austin".to_string()),
            ..Default::default()
        };
        let matched = filter_records(&records, &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name(), "Bolt Electric");
    }

    #[test]
    fn test_min_rating_excludes_missing_ratings() {
        let records = sample();
        let filters = Filters {
            min_rating: Some(3.0),
            ..Default::default()
        };
        let matched = filter_records(&records, &filters);
        // Crown Roofing has no rating at all, so it never qualifies.
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_incomplete_contact_selects_any_missing_method() {
        let records = sample();
        let filters = Filters {
            incomplete_contact: true,
            ..Default::default()
        };
        let matched = filter_records(&records, &filters);
        // Bolt is missing email, Crown is missing everything; Acme has
        // all three contact methods and is excluded.
        let names: Vec<_> = matched.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Bolt Electric", "Crown Roofing"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = sample();
        let filters = Filters {
            area: Some("North".to_string()),
            has_website: Some(false),
            ..Default::default()
        };
        let matched = filter_records(&records, &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name(), "Crown Roofing");
    }

    #[test]
    fn test_numeric_sort_on_reviews() {
        let records = sample();
        let sort = Sort {
            field: "reviews_count".to_string(),
            direction: SortDirection::Desc,
        };
        let page = query(&records, &Filters::default(), Some(&sort), 1, 25);
        let names: Vec<_> = page.rows.iter().map(|r| r.name().to_string()).collect();
        // Numeric comparison: 100 > 10 > 2 (a lexicographic sort would
        // put "2" after "100").
        assert_eq!(names, vec!["Crown Roofing", "Acme Plumbing", "Bolt Electric"]);
    }

    #[test]
    fn test_string_sort_is_case_insensitive() {
        let records = vec![
            record(&[("business_name", "beta")]),
            record(&[("business_name", "Alpha")]),
        ];
        let sort = Sort {
            field: "business_name".to_string(),
            direction: SortDirection::Asc,
        };
        let page = query(&records, &Filters::default(), Some(&sort), 1, 25);
        assert_eq!(page.rows[0].name(), "Alpha");
    }

    #[test]
    fn test_out_of_range_page_is_empty_but_well_formed() {
        let records: Vec<Record> = (0..7)
            .map(|i| record(&[("business_name", format!("Biz {i}").as_str())]))
            .collect();
        let page = query(&records, &Filters::default(), None, 2, 25);
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_pagination_boundaries() {
        let records: Vec<Record> = (0..7)
            .map(|i| record(&[("business_name", format!("Biz {i}").as_str())]))
            .collect();
        let page = query(&records, &Filters::default(), None, 2, 3);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows[0].name(), "Biz 3");

        let last = query(&records, &Filters::default(), None, 3, 3);
        assert_eq!(last.rows.len(), 1);
    }

    #[test]
    fn test_empty_result_is_a_well_formed_page() {
        let page = query(&[], &Filters::default(), None, 1, 25);
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }
}
