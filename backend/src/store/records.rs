//! Cultivar record store

use serde_json::Value;
use shared::metrics::derive_metrics;
use shared::normalize::{normalize, to_storage_table};
use shared::validation::text_from_value;
use shared::{
    records_to_table, CanonicalRecordSet, CultivarRecord, NormalizedRecordSet, RawTable,
    RecordColumn,
};
use std::sync::Arc;

use super::{RowStore, StoreResult};

const BLANK_STATUS: &str = "0";

/// Loads, normalizes and saves the cultivar record table
#[derive(Clone)]
pub struct RecordStore {
    rows: Arc<dyn RowStore>,
}

impl RecordStore {
    pub fn new(rows: Arc<dyn RowStore>) -> Self {
        Self { rows }
    }

    /// Read and normalize the stored records.
    ///
    /// Never fails: a missing store is initialized with the canonical header
    /// and an unreadable one yields an empty set.
    pub fn load_normalized(&self) -> NormalizedRecordSet {
        match self.rows.read_rows() {
            Ok(Some(mut table)) => {
                clear_status_placeholders(&mut table);
                normalize(&table)
            }
            Ok(None) => {
                let empty = RawTable::with_columns(&RecordColumn::names());
                if let Err(e) = self.rows.write_rows(&empty) {
                    tracing::warn!("Could not initialize record store: {}", e);
                }
                NormalizedRecordSet::empty()
            }
            Err(e) => {
                tracing::warn!("Could not read record store, using an empty set: {}", e);
                NormalizedRecordSet::empty()
            }
        }
    }

    /// Canonical records with percent and status derived
    pub fn load(&self) -> CanonicalRecordSet {
        derive_metrics(self.load_normalized())
    }

    /// Persist a raw table, keeping only the canonical columns
    pub fn save(&self, table: &RawTable) -> StoreResult<()> {
        self.rows.write_rows(&to_storage_table(table))
    }

    pub fn save_records(&self, records: &[CultivarRecord]) -> StoreResult<()> {
        self.save(&records_to_table(records))
    }
}

/// Status cells hold `0` when saved blank; read them back as blank
fn clear_status_placeholders(table: &mut RawTable) {
    let status = RecordColumn::Status.name();
    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(status) {
            if text_from_value(cell) == BLANK_STATUS {
                *cell = Value::Null;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CsvRowStore;
    use rust_decimal::Decimal;
    use shared::{ColumnPresence, ReceivingStatus};
    use std::fs;

    fn store_in(dir: &tempfile::TempDir) -> (RecordStore, CsvRowStore) {
        let csv = CsvRowStore::new(dir.path().join("data.csv"));
        (RecordStore::new(Arc::new(csv.clone())), csv)
    }

    #[test]
    fn missing_file_is_created_with_canonical_header() {
        let dir = tempfile::tempdir().unwrap();
        let (store, csv) = store_in(&dir);

        let records = store.load();
        assert!(records.is_empty());
        let header = fs::read_to_string(csv.path()).unwrap();
        assert_eq!(header.trim(), "Cultivar,Prev_Colheita,Prev_Receb,Recepcao,Categoria,Status");
    }

    #[test]
    fn unreadable_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (store, csv) = store_in(&dir);
        fs::write(csv.path(), b"Cultivar,Recepcao\n\xff\xfe,1\n").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_reproduces_canonical_values() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = store_in(&dir);
        fs::write(
            dir.path().join("data.csv"),
            "Cultivar,Prev_Colheita,Prev_Receb,Recepcao,Categoria\n\
             TRUNFO,1200,1000,400,Pão\n\
             VELOZ,800,0,50,Melhorador\n",
        )
        .unwrap();

        let first = store.load();
        assert_eq!(first[0].status, ReceivingStatus::InProgress);
        assert_eq!(first[0].percent, Decimal::from(40));
        assert_eq!(first[1].status, ReceivingStatus::InvalidForecast);

        store.save_records(&first).unwrap();
        let second = store.load();
        assert_eq!(first, second);
        assert_eq!(store.load_normalized().status_presence, ColumnPresence::Populated);
    }

    #[test]
    fn gaps_are_filled_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let (store, csv) = store_in(&dir);
        let table = RawTable::from_rows(vec![[("Cultivar", "TRUNFO"), ("Recepcao", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect()]);

        store.save(&table).unwrap();
        let text = fs::read_to_string(csv.path()).unwrap();
        assert_eq!(text.lines().nth(1), Some("TRUNFO,0,0,0,N/A,0"));

        let records = store.load();
        assert_eq!(records[0].status, ReceivingStatus::InvalidForecast);
        assert_eq!(store.load_normalized().status_presence, ColumnPresence::Empty);
    }

    #[test]
    fn blank_text_and_padded_status_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = store_in(&dir);
        fs::write(
            dir.path().join("data.csv"),
            "Cultivar,Prev_Colheita,Prev_Receb,Recepcao,Categoria,Status\n\
             TRUNFO,0,1000,400,,\"  Aguardando laudo \"\n\
             ,0,500,0,Pão,OK\n",
        )
        .unwrap();

        let first = store.load();
        assert_eq!(first[0].category, "");
        assert_eq!(first[0].status, ReceivingStatus::Custom("Aguardando laudo".into()));
        assert_eq!(first[1].cultivar, "");

        store.save_records(&first).unwrap();
        assert_eq!(store.load(), first);
    }
}
