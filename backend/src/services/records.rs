//! Cultivar record service: load, edit, register and bulk import

use rust_decimal::Decimal;
use serde_json::Value;
use shared::metrics::compute_percent;
use shared::normalize::coerce_volume_columns;
use shared::{
    validate_cultivar_name, validate_record_import, validate_volume, CanonicalRecordSet,
    CultivarRecord, RawTable, ReceivingStatus, RecordColumn, RegisterRecordInput, NOT_AVAILABLE,
};

use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// Status given to registered and imported rows
const NEW_RECORD_STATUS: ReceivingStatus = ReceivingStatus::InProgress;

#[derive(Clone)]
pub struct RecordService {
    store: RecordStore,
}

impl RecordService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Current canonical records with derived metrics
    pub fn get_canonical_records(&self) -> CanonicalRecordSet {
        self.store.load()
    }

    /// Replace the whole record table with edited rows, then reload
    pub fn update_records(&self, mut table: RawTable) -> AppResult<CanonicalRecordSet> {
        coerce_volume_columns(&mut table);
        self.store.save(&table)?;
        tracing::info!(rows = table.len(), "Records updated");
        Ok(self.store.load())
    }

    /// Append a single cultivar entered by hand
    pub fn register_record(&self, input: RegisterRecordInput) -> AppResult<CultivarRecord> {
        let cultivar = input.cultivar.trim().to_string();
        validate_cultivar_name(&cultivar)
            .map_err(|e| AppError::validation("cultivar", e, "Nome da cultivar é obrigatório"))?;

        let harvest_forecast = checked_volume("prev_colheita", input.prev_colheita)?;
        let receiving_forecast = checked_volume("prev_receb", input.prev_receb)?;
        let received = checked_volume("recepcao", input.recepcao)?;

        let record = CultivarRecord {
            cultivar,
            harvest_forecast,
            receiving_forecast,
            received,
            category: input
                .categoria
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: NEW_RECORD_STATUS,
            percent: compute_percent(receiving_forecast, received),
        };

        let mut records = self.store.load();
        records.push(record.clone());
        self.store.save_records(&records)?;

        tracing::info!(cultivar = %record.cultivar, total = records.len(), "Cultivar registered");
        Ok(record)
    }

    /// Replace the record table with an imported one.
    ///
    /// The five volume and name columns are required; a missing Status column
    /// is added with every row in progress. Returns the number of rows saved.
    pub fn import_records(&self, mut table: RawTable) -> AppResult<usize> {
        validate_record_import(&table)?;

        if !table.has_column(RecordColumn::Status.name()) {
            table.fill_column(
                RecordColumn::Status.name(),
                Value::String(NEW_RECORD_STATUS.label().to_string()),
            );
        }

        self.store.save(&table)?;
        tracing::info!(rows = table.len(), "Records imported");
        Ok(table.len())
    }
}

fn checked_volume(field: &str, value: Option<Decimal>) -> AppResult<Decimal> {
    let value = value.unwrap_or(Decimal::ZERO);
    validate_volume(value)
        .map_err(|e| AppError::validation(field, e, "O volume não pode ser negativo"))?;
    Ok(value)
}
