//! Lead query, vocabulary, stats, and export endpoints.

use crate::error::{Result, WebError};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use prospect_core::{
    export_csv, filter_records, query, Error as CoreError, Filters, Partition, QueryPage, Sort,
    SortDirection, StatsSnapshot,
};
use serde::Deserialize;

pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/api/leads", get(list_leads))
        .route("/api/filters", get(filter_options))
        .route("/api/stats", get(stats))
        .route("/api/export", post(export))
}

/// Resolve an optional `partition` parameter, defaulting to the store's
/// preferred partition.
fn resolve_partition(name: Option<&str>, state: &AppState) -> Result<Partition> {
    match name {
        None | Some("") => Ok(state.store.default_partition()),
        Some("general") => Ok(Partition::General),
        Some("qualified") => Ok(Partition::Qualified),
        Some(other) => Err(WebError::BadRequest(format!(
            "Unknown partition '{other}' (expected 'general' or 'qualified')"
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LeadsQuery {
    search: Option<String>,
    category: Option<String>,
    area: Option<String>,
    has_website: Option<bool>,
    min_rating: Option<f64>,
    incomplete_contact: Option<bool>,
    partition: Option<String>,
    page: usize,
    page_size: usize,
    sort_field: Option<String>,
    sort_direction: Option<SortDirection>,
}

impl Default for LeadsQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            area: None,
            has_website: None,
            min_rating: None,
            incomplete_contact: None,
            partition: None,
            page: 1,
            page_size: 25,
            sort_field: None,
            sort_direction: None,
        }
    }
}

impl LeadsQuery {
    fn filters(&self) -> Filters {
        Filters {
            search: self.search.clone(),
            category: self.category.clone(),
            area: self.area.clone(),
            has_website: self.has_website,
            min_rating: self.min_rating,
            incomplete_contact: self.incomplete_contact.unwrap_or(false),
        }
    }
}

async fn list_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadsQuery>,
) -> Result<Json<QueryPage>> {
    let partition = resolve_partition(params.partition.as_deref(), &state)?;
    let snapshot = state.store.snapshot(partition);

    let sort = params.sort_field.as_ref().map(|field| Sort {
        field: field.clone(),
        direction: params.sort_direction.unwrap_or_default(),
    });

    let page = query(
        &snapshot,
        &params.filters(),
        sort.as_ref(),
        params.page,
        params.page_size,
    );
    Ok(Json(page))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartitionQuery {
    partition: Option<String>,
}

async fn filter_options(
    State(state): State<AppState>,
    Query(params): Query<PartitionQuery>,
) -> Result<Json<serde_json::Value>> {
    let partition = resolve_partition(params.partition.as_deref(), &state)?;
    Ok(Json(serde_json::json!({
        "categories": state.store.categories(partition),
        "areas": state.store.areas(partition),
    })))
}

async fn stats(
    State(state): State<AppState>,
    Query(params): Query<PartitionQuery>,
) -> Result<Json<StatsSnapshot>> {
    let partition = resolve_partition(params.partition.as_deref(), &state)?;
    let snapshot = state.store.snapshot(partition);
    Ok(Json(StatsSnapshot::compute(&snapshot)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExportFilters {
    search: Option<String>,
    category: Option<String>,
    area: Option<String>,
    has_website: Option<bool>,
    min_rating: Option<f64>,
    incomplete_contact: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExportRequest {
    filters: ExportFilters,
    partition: Option<String>,
}

async fn export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse> {
    let partition = resolve_partition(request.partition.as_deref(), &state)?;
    let snapshot = state.store.snapshot(partition);

    let filters = Filters {
        search: request.filters.search,
        category: request.filters.category,
        area: request.filters.area,
        has_website: request.filters.has_website,
        min_rating: request.filters.min_rating,
        incomplete_contact: request.filters.incomplete_contact.unwrap_or(false),
    };
    let matched = filter_records(&snapshot, &filters);

    let csv = export_csv(&matched).map_err(|e| match e {
        CoreError::NoRecords => WebError::NoExportData,
        other => WebError::Internal(other.to_string()),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads_export.csv\"",
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_core::{BroadcastHub, Record, RecordMeta, RecordStore};
    use std::sync::Arc;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::new(
            fields,
            RecordMeta {
                source_file: "test.csv".to_string(),
                qualified: false,
                ingested_at: chrono::Utc::now(),
            },
        )
    }

    fn state_with_general(records: Vec<Record>) -> AppState {
        let store = Arc::new(RecordStore::new());
        for r in records {
            store.upsert(Partition::General, r);
        }
        AppState::new(store, BroadcastHub::new())
    }

    #[tokio::test]
    async fn test_list_leads_defaults_to_page_one() {
        let state = state_with_general(vec![
            record(&[("business_name", "Acme"), ("address", "1 St"), ("city", "X")]),
            record(&[("business_name", "Bolt"), ("address", "2 St"), ("city", "X")]),
        ]);

        let Json(page) = list_leads(State(state), Query(LeadsQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_partition_is_rejected() {
        let state = state_with_general(vec![]);
        let params = LeadsQuery {
            partition: Some("archived".to_string()),
            ..Default::default()
        };
        let result = list_leads(State(state), Query(params)).await;
        assert!(matches!(result, Err(WebError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_serve_qualified_when_populated() {
        let store = Arc::new(RecordStore::new());
        store.upsert(
            Partition::General,
            record(&[("business_name", "Acme"), ("address", "1 St"), ("city", "X")]),
        );
        store.upsert(
            Partition::Qualified,
            record(&[("business_name", "Bolt"), ("address", "2 St"), ("city", "X")]),
        );
        let state = AppState::new(store, BroadcastHub::new());

        let Json(stats) = stats(State(state), Query(PartitionQuery::default()))
            .await
            .unwrap();
        assert_eq!(stats.total_records, 1);
    }

    #[tokio::test]
    async fn test_export_with_no_matches_is_an_error() {
        let state = state_with_general(vec![]);
        let result = export(State(state), Json(ExportRequest::default())).await;
        assert!(matches!(result, Err(WebError::NoExportData)));
    }

    #[tokio::test]
    async fn test_filter_options_lists_vocabularies() {
        let state = state_with_general(vec![
            record(&[
                ("business_name", "Acme"),
                ("address", "1 St"),
                ("city", "X"),
                ("category", "Plumber"),
                ("area", "North"),
            ]),
        ]);

        let Json(value) = filter_options(State(state), Query(PartitionQuery::default()))
            .await
            .unwrap();
        assert_eq!(value["categories"][0], "Plumber");
        assert_eq!(value["areas"][0], "North");
    }
}
