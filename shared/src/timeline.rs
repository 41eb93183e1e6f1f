//! Timeline building: strict event import, category join, kg→SC conversion
//! and synthetic sample generation

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ImportError, ImportResult};
use crate::models::{
    kg_to_sc, CultivarRecord, Shift, TimelineColumn, TimelineEvent, TimelineRecord, NOT_AVAILABLE,
};
use crate::types::{RawRow, RawTable};
use crate::validation::{date_from_value, decimal_from_value, text_from_value};

/// Days before "now" at which a synthetic sample starts
pub const SAMPLE_WINDOW_DAYS: i64 = 60;

/// Bounds (inclusive) of a single synthetic delivery, in SC
pub const SAMPLE_VOLUME_RANGE: (u32, u32) = (100, 1000);

/// Bounds (inclusive) of the gap between synthetic deliveries, in days
pub const SAMPLE_STEP_DAYS: (i64, i64) = (1, 3);

/// Cultivar → category mapping, built once per import.
///
/// On duplicate cultivars the first record wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    categories: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn from_records(records: &[CultivarRecord]) -> Self {
        let mut categories = HashMap::new();
        for record in records {
            categories
                .entry(record.cultivar.clone())
                .or_insert_with(|| record.category.clone());
        }
        Self { categories }
    }

    /// Category of a cultivar, or "N/A" when it is not registered
    pub fn category_for(&self, cultivar: &str) -> &str {
        self.categories
            .get(cultivar)
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Find the header a timeline column uses in this table
fn resolve_column(table: &RawTable, column: TimelineColumn) -> Option<String> {
    [column.name(), column.template_name()]
        .into_iter()
        .find(|name| table.has_column(name))
        .map(String::from)
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

/// Parse raw receiving rows into events, all or nothing.
///
/// Columns are checked first, then every date, then every quantity, then
/// every shift; the first failure rejects the whole table. Row numbers in
/// errors are 1-based.
pub fn parse_events(table: &RawTable) -> ImportResult<Vec<TimelineEvent>> {
    let mut resolved = HashMap::new();
    let mut missing = Vec::new();
    for column in TimelineColumn::REQUIRED {
        match resolve_column(table, column) {
            Some(header) => {
                resolved.insert(column.name(), header);
            }
            None => missing.push(column.name().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            required: TimelineColumn::REQUIRED
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            missing,
        });
    }
    let header = |column: TimelineColumn| resolved[column.name()].as_str();

    let mut dates = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let value = cell(row, header(TimelineColumn::Date));
        let date = date_from_value(value).ok_or_else(|| ImportError::InvalidDate {
            row: idx + 1,
            value: text_from_value(value),
        })?;
        dates.push(date);
    }

    let mut quantities = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let value = cell(row, header(TimelineColumn::QuantityKg));
        let quantity = decimal_from_value(value)
            .filter(|q| *q >= Decimal::ZERO)
            .ok_or_else(|| ImportError::InvalidQuantity {
                row: idx + 1,
                value: text_from_value(value),
            })?;
        quantities.push(quantity);
    }

    let mut shifts = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let text = text_from_value(cell(row, header(TimelineColumn::Shift)));
        let shift = Shift::parse(&text).ok_or(ImportError::InvalidShift {
            row: idx + 1,
            value: text,
        })?;
        shifts.push(shift);
    }

    Ok(table
        .rows
        .iter()
        .zip(dates)
        .zip(quantities)
        .zip(shifts)
        .map(|(((row, date), quantity_kg), shift)| TimelineEvent {
            responsible: text_from_value(cell(row, header(TimelineColumn::Responsible))),
            date,
            shift,
            cultivar: text_from_value(cell(row, header(TimelineColumn::Cultivar))),
            quantity_kg,
        })
        .collect())
}

/// Convert events to canonical timeline records
pub fn import_events(events: &[TimelineEvent], lookup: &CategoryLookup) -> Vec<TimelineRecord> {
    events
        .iter()
        .map(|event| TimelineRecord {
            date: event.date,
            cultivar: event.cultivar.clone(),
            category: lookup.category_for(&event.cultivar).to_string(),
            volume_sc: kg_to_sc(event.quantity_kg),
        })
        .collect()
}

/// Spread each record's received volume over random dates in the
/// [`SAMPLE_WINDOW_DAYS`] days up to `today`.
///
/// Every step takes `min(draw, remaining)` SC and moves forward 1–3 days.
/// If the window ends with volume left, the rest is booked on `today`, so
/// each cultivar's samples add up to its received volume and no date is
/// later than `today`.
pub fn generate_synthetic_sample<R: Rng + ?Sized>(
    records: &[CultivarRecord],
    today: NaiveDate,
    rng: &mut R,
) -> Vec<TimelineRecord> {
    let start = today - Duration::days(SAMPLE_WINDOW_DAYS);
    let mut samples = Vec::new();

    for record in records.iter().filter(|r| r.received > Decimal::ZERO) {
        let sample = |date: NaiveDate, volume_sc: Decimal| TimelineRecord {
            date,
            cultivar: record.cultivar.clone(),
            category: record.category.clone(),
            volume_sc,
        };

        let mut remaining = record.received;
        let mut date = start;
        while remaining > Decimal::ZERO && date <= today {
            let draw = Decimal::from(rng.gen_range(SAMPLE_VOLUME_RANGE.0..=SAMPLE_VOLUME_RANGE.1));
            let volume = draw.min(remaining);
            samples.push(sample(date, volume));
            remaining -= volume;
            date += Duration::days(rng.gen_range(SAMPLE_STEP_DAYS.0..=SAMPLE_STEP_DAYS.1));
        }
        if remaining > Decimal::ZERO {
            samples.push(sample(today, remaining));
        }
    }

    samples
}
