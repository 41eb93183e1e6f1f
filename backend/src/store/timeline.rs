//! Receiving timeline store

use rust_decimal::Decimal;
use serde_json::Value;
use shared::validation::{date_from_value, decimal_from_value, text_from_value};
use shared::{RawRow, RawTable, TimelineRecord, NOT_AVAILABLE, TIMELINE_RECORD_COLUMNS};
use std::sync::Arc;

use super::{RowStore, StoreResult};

/// Persists canonical timeline records (`Data,Cultivar,Categoria,Volume_SC`)
#[derive(Clone)]
pub struct TimelineStore {
    rows: Arc<dyn RowStore>,
}

impl TimelineStore {
    pub fn new(rows: Arc<dyn RowStore>) -> Self {
        Self { rows }
    }

    /// Read the stored timeline.
    ///
    /// Rows with an unreadable date are dropped. A missing store is
    /// initialized with the canonical header and an unreadable one yields an
    /// empty timeline.
    pub fn load(&self) -> Vec<TimelineRecord> {
        match self.rows.read_rows() {
            Ok(Some(table)) => records_from_table(&table),
            Ok(None) => {
                let empty = RawTable::with_columns(&TIMELINE_RECORD_COLUMNS);
                if let Err(e) = self.rows.write_rows(&empty) {
                    tracing::warn!("Could not initialize timeline store: {}", e);
                }
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Could not read timeline store, using an empty timeline: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored timeline
    pub fn save(&self, records: &[TimelineRecord]) -> StoreResult<()> {
        self.rows.write_rows(&records_to_table(records))
    }
}

fn records_from_table(table: &RawTable) -> Vec<TimelineRecord> {
    let [date_col, cultivar_col, category_col, volume_col] = TIMELINE_RECORD_COLUMNS;
    let has_category = table.has_column(category_col);

    let mut dropped = 0usize;
    let records: Vec<TimelineRecord> = table
        .rows
        .iter()
        .filter_map(|row| {
            let date = row.get(date_col).and_then(date_from_value);
            if date.is_none() {
                dropped += 1;
            }
            Some(TimelineRecord {
                date: date?,
                cultivar: row.get(cultivar_col).map(text_from_value).unwrap_or_default(),
                category: if has_category {
                    row.get(category_col).map(text_from_value).unwrap_or_default()
                } else {
                    NOT_AVAILABLE.to_string()
                },
                volume_sc: row
                    .get(volume_col)
                    .and_then(decimal_from_value)
                    .unwrap_or(Decimal::ZERO),
            })
        })
        .collect();

    if dropped > 0 {
        tracing::warn!(dropped, "Dropped timeline rows with unreadable dates");
    }
    records
}

fn records_to_table(records: &[TimelineRecord]) -> RawTable {
    let [date_col, cultivar_col, category_col, volume_col] = TIMELINE_RECORD_COLUMNS;
    let rows = records
        .iter()
        .map(|record| {
            let mut row = RawRow::new();
            row.insert(
                date_col.to_string(),
                Value::String(record.date.format("%Y-%m-%d").to_string()),
            );
            row.insert(cultivar_col.to_string(), Value::String(record.cultivar.clone()));
            row.insert(category_col.to_string(), Value::String(record.category.clone()));
            row.insert(volume_col.to_string(), Value::String(record.volume_sc.to_string()));
            row
        })
        .collect();

    RawTable {
        columns: TIMELINE_RECORD_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}
