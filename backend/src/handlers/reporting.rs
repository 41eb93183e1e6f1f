//! Aggregated view handlers with CSV export

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::AggregationKind;

use crate::error::{AppError, AppResult};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct AggregationQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get one aggregated view
pub async fn get_aggregation(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<AggregationQuery>,
) -> AppResult<impl IntoResponse> {
    let kind: AggregationKind = kind
        .parse()
        .map_err(|_| AppError::NotFound(format!("Aggregation '{}'", kind)))?;

    let service = ReportingService::new(state.record_store(), state.timeline_service());
    let table = {
        // loading may initialize a store or persist a generated sample
        let _guard = state.write_gate.lock().await;
        service.get_aggregation(kind)?
    };

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::table_to_csv(&table)?;
        let disposition = format!("attachment; filename=\"{}.csv\"", kind);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(table).into_response())
    }
}
