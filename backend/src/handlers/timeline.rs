//! Receiving timeline HTTP handlers

use axum::{extract::State, Json};
use shared::TimelineRecord;

use super::{ImportResponse, TablePayload};
use crate::error::AppResult;
use crate::AppState;

/// Daily receiving timeline; may persist a generated sample
pub async fn get_timeline(State(state): State<AppState>) -> AppResult<Json<Vec<TimelineRecord>>> {
    let _guard = state.write_gate.lock().await;
    let timeline = state.timeline_service().get_timeline()?;
    Ok(Json(timeline))
}

/// Replace the timeline with imported receiving events
pub async fn import_timeline(
    State(state): State<AppState>,
    Json(payload): Json<TablePayload>,
) -> AppResult<Json<ImportResponse>> {
    let _guard = state.write_gate.lock().await;
    let count = state.timeline_service().import_timeline(payload.into_table())?;
    Ok(Json(ImportResponse {
        message: format!(
            "Dados de timeline importados com sucesso! {} registros processados.",
            count
        ),
        records_processed: count,
    }))
}
