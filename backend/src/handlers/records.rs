//! Cultivar record HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use shared::{CanonicalRecordSet, RegisterRecordInput};

use super::{ImportResponse, TablePayload};
use crate::error::AppResult;
use crate::services::RecordService;
use crate::AppState;

/// List canonical records with derived percent and status
pub async fn list_records(State(state): State<AppState>) -> Json<CanonicalRecordSet> {
    // a missing store is initialized on load
    let _guard = state.write_gate.lock().await;
    let service = RecordService::new(state.record_store());
    Json(service.get_canonical_records())
}

/// Replace the record table with edited rows
pub async fn update_records(
    State(state): State<AppState>,
    Json(payload): Json<TablePayload>,
) -> AppResult<Json<CanonicalRecordSet>> {
    let _guard = state.write_gate.lock().await;
    let service = RecordService::new(state.record_store());
    let records = service.update_records(payload.into_table())?;
    Ok(Json(records))
}

/// Register a single cultivar
pub async fn register_record(
    State(state): State<AppState>,
    Json(input): Json<RegisterRecordInput>,
) -> AppResult<impl IntoResponse> {
    let _guard = state.write_gate.lock().await;
    let service = RecordService::new(state.record_store());
    let record = service.register_record(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace the record table with an imported spreadsheet
pub async fn import_records(
    State(state): State<AppState>,
    Json(payload): Json<TablePayload>,
) -> AppResult<Json<ImportResponse>> {
    let _guard = state.write_gate.lock().await;
    let service = RecordService::new(state.record_store());
    let count = service.import_records(payload.into_table())?;
    Ok(Json(ImportResponse {
        message: "Dados importados e compilados com sucesso!".to_string(),
        records_processed: count,
    }))
}
