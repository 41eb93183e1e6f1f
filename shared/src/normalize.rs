//! Record normalization: missing-column defaults and tolerant type coercion
//!
//! Nothing in this module fails. A cell that cannot be read degrades to its
//! column default (0 for volumes, "N/A" for text of an absent column) and is
//! logged at `warn`.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::{NormalizedRecord, NormalizedRecordSet, ReceivingStatus, RecordColumn, NOT_AVAILABLE};
use crate::types::{is_blank, ColumnPresence, RawRow, RawTable};
use crate::validation::{decimal_from_value, text_from_value};

/// Normalize a raw record table into the canonical schema
pub fn normalize(table: &RawTable) -> NormalizedRecordSet {
    let present = |column: RecordColumn| table.has_column(column.name());
    let status_presence = table.presence(RecordColumn::Status.name());

    let text = |row: &RawRow, column: RecordColumn| -> String {
        if present(column) {
            row.get(column.name()).map(text_from_value).unwrap_or_default()
        } else {
            NOT_AVAILABLE.to_string()
        }
    };
    let number = |row: &RawRow, column: RecordColumn| volume_or_zero(row, column);

    let records = table
        .rows
        .iter()
        .map(|row| NormalizedRecord {
            cultivar: text(row, RecordColumn::Cultivar),
            harvest_forecast: number(row, RecordColumn::HarvestForecast),
            receiving_forecast: number(row, RecordColumn::ReceivingForecast),
            received: number(row, RecordColumn::Received),
            category: text(row, RecordColumn::Category),
            status: match status_presence {
                ColumnPresence::Populated => row
                    .get(RecordColumn::Status.name())
                    .and_then(|v| ReceivingStatus::parse(&text_from_value(v))),
                _ => None,
            },
        })
        .collect();

    NormalizedRecordSet {
        records,
        status_presence,
    }
}

/// Coerce the three volume columns in place; unreadable cells become 0
pub fn coerce_volume_columns(table: &mut RawTable) {
    for row in &mut table.rows {
        for column in RecordColumn::ALL.iter().filter(|c| c.is_numeric()) {
            let value = volume_or_zero(row, *column);
            row.insert(column.name().to_string(), Value::String(value.to_string()));
        }
    }
    for column in RecordColumn::ALL.iter().filter(|c| c.is_numeric()) {
        if !table.has_column(column.name()) {
            table.columns.push(column.name().to_string());
        }
    }
}

/// Volume in a cell; blank cells are 0 and unreadable ones are 0 with a warning
fn volume_or_zero(row: &RawRow, column: RecordColumn) -> Decimal {
    match row.get(column.name()) {
        Some(value) if !is_blank(value) => decimal_from_value(value).unwrap_or_else(|| {
            tracing::warn!(column = column.name(), value = %value, "Unreadable volume, using 0");
            Decimal::ZERO
        }),
        _ => Decimal::ZERO,
    }
}

/// Stored value of an empty cell. Volumes and Status hold `0`; text keeps
/// what normalization would give it, so a reload sees the same values.
fn storage_gap(column: RecordColumn, present: bool) -> &'static str {
    match column {
        RecordColumn::Cultivar | RecordColumn::Category if present => "",
        RecordColumn::Cultivar | RecordColumn::Category => NOT_AVAILABLE,
        _ => "0",
    }
}

/// Project a table onto the canonical storage columns, filling gaps
pub fn to_storage_table(table: &RawTable) -> RawTable {
    let gaps: Vec<(RecordColumn, &str)> = RecordColumn::ALL
        .iter()
        .map(|&c| (c, storage_gap(c, table.has_column(c.name()))))
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            gaps.iter()
                .map(|(column, gap)| {
                    let value = match row.get(column.name()) {
                        Some(v) if !is_blank(v) => text_from_value(v),
                        _ => gap.to_string(),
                    };
                    (column.name().to_string(), Value::String(value))
                })
                .collect::<RawRow>()
        })
        .collect();

    RawTable {
        columns: RecordColumn::names().into_iter().map(String::from).collect(),
        rows,
    }
}
