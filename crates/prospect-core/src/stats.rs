//! Statistics aggregation over a partition snapshot.

use crate::record::Record;
use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate statistics computed from a partition snapshot.
///
/// Averages are kept at full precision internally; rounding to the
/// display precision (two decimals for rating, one for reviews) happens
/// only at serialization time.
///
/// The two means are deliberately asymmetric: the rating mean skips
/// records without a parseable rating entirely, while the reviews mean
/// counts missing review counts as zero over every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Total records in the partition.
    pub total_records: usize,
    /// Records with a non-blank phone number.
    pub with_phone: usize,
    /// Records with a non-blank email address.
    pub with_email: usize,
    /// Records with a non-blank website.
    pub with_website: usize,
    /// Distinct categories seen.
    pub unique_categories: usize,
    /// Distinct areas seen (including the "Unknown" bucket).
    pub unique_areas: usize,
    /// Mean rating over records with a parseable rating.
    #[serde(serialize_with = "round2")]
    pub average_rating: f64,
    /// Mean review count over all records.
    #[serde(serialize_with = "round1")]
    pub average_reviews: f64,
    /// Record count per category.
    pub category_distribution: BTreeMap<String, usize>,
    /// Record count per area, with `city` then "Unknown" as fallbacks.
    pub area_distribution: BTreeMap<String, usize>,
}

fn round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

fn round1<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10.0).round() / 10.0)
}

impl StatsSnapshot {
    /// Compute statistics over a partition snapshot.
    pub fn compute(records: &[Record]) -> Self {
        let mut with_phone = 0;
        let mut with_email = 0;
        let mut with_website = 0;
        let mut rating_sum = 0.0;
        let mut rating_count = 0usize;
        let mut reviews_sum = 0.0;
        let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut area_distribution: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            if record.has_phone() {
                with_phone += 1;
            }
            if record.has_email() {
                with_email += 1;
            }
            if record.has_website() {
                with_website += 1;
            }

            if let Some(category) = record.get_nonempty("category") {
                *category_distribution.entry(category.to_string()).or_default() += 1;
            }

            // Never drop a record from the area distribution.
            let area = match record.locality() {
                "" => "Unknown",
                locality => locality,
            };
            *area_distribution.entry(area.to_string()).or_default() += 1;

            if let Some(rating) = record.rating() {
                rating_sum += rating;
                rating_count += 1;
            }
            reviews_sum += record.reviews_count();
        }

        let average_rating = if rating_count > 0 {
            rating_sum / rating_count as f64
        } else {
            0.0
        };
        let average_reviews = if records.is_empty() {
            0.0
        } else {
            reviews_sum / records.len() as f64
        };

        Self {
            total_records: records.len(),
            with_phone,
            with_email,
            with_website,
            unique_categories: category_distribution.len(),
            unique_areas: area_distribution.len(),
            average_rating,
            average_reviews,
            category_distribution,
            area_distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;

    #[test]
    fn test_rating_and_reviews_means_use_different_denominators() {
        let records = vec![
            record(&[("name", "A"), ("rating", "4.0"), ("reviews_count", "10")]),
            record(&[("name", "B")]),
            record(&[("name", "C"), ("rating", "5.0"), ("reviews_count", "20")]),
        ];
        let stats = StatsSnapshot::compute(&records);

        // Rating: (4.0 + 5.0) / 2; missing rating excluded entirely.
        assert_eq!(stats.average_rating, 4.5);
        // Reviews: (10 + 0 + 20) / 3; missing counted as zero.
        assert_eq!(stats.average_reviews, 10.0);
    }

    #[test]
    fn test_unparseable_rating_is_excluded() {
        let records = vec![
            record(&[("name", "A"), ("rating", "4.0")]),
            record(&[("name", "B"), ("rating", "not rated")]),
        ];
        let stats = StatsSnapshot::compute(&records);
        assert_eq!(stats.average_rating, 4.0);
    }

    #[test]
    fn test_area_falls_back_to_city_then_unknown() {
        let records = vec![
            record(&[("name", "A"), ("area", "North")]),
            record(&[("name", "B"), ("city", "Austin")]),
            record(&[("name", "C")]),
        ];
        let stats = StatsSnapshot::compute(&records);
        assert_eq!(stats.area_distribution.get("North"), Some(&1));
        assert_eq!(stats.area_distribution.get("Austin"), Some(&1));
        assert_eq!(stats.area_distribution.get("Unknown"), Some(&1));
        assert_eq!(stats.unique_areas, 3);
    }

    #[test]
    fn test_contact_counts() {
        let records = vec![
            record(&[("name", "A"), ("phone", "1"), ("email", "a@b.c"), ("website", "w")]),
            record(&[("name", "B"), ("phone", "2")]),
            record(&[("name", "C"), ("phone", "  ")]),
        ];
        let stats = StatsSnapshot::compute(&records);
        assert_eq!(stats.with_phone, 2);
        assert_eq!(stats.with_email, 1);
        assert_eq!(stats.with_website, 1);
        assert_eq!(stats.total_records, 3);
    }

    #[test]
    fn test_empty_partition_yields_zeroed_stats() {
        let stats = StatsSnapshot::compute(&[]);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.average_reviews, 0.0);
        assert!(stats.category_distribution.is_empty());
    }

    #[test]
    fn test_serialization_rounds_for_display() {
        let records = vec![
            record(&[("name", "A"), ("rating", "4.333"), ("reviews_count", "7")]),
            record(&[("name", "B"), ("rating", "4.0"), ("reviews_count", "8")]),
        ];
        let stats = StatsSnapshot::compute(&records);
        // Full precision internally.
        assert!((stats.average_rating - 4.1665).abs() < 1e-9);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["average_rating"], 4.17);
        assert_eq!(json["average_reviews"], 7.5);
    }
}
