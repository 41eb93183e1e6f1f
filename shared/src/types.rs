//! Common types used across the platform

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A raw row keyed by column name
pub type RawRow = BTreeMap<String, Value>;

/// Raw tabular input, as read from a store or received from a client.
///
/// Column names are kept separately from the rows so that a header-only
/// table (no data rows) still reports which columns it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table with the given header
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from row maps, collecting columns in first-seen order
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Inspect a column once: absent, present but blank in every row, or
    /// present with at least one value
    pub fn presence(&self, name: &str) -> ColumnPresence {
        if !self.has_column(name) {
            return ColumnPresence::Absent;
        }
        let populated = self
            .rows
            .iter()
            .any(|row| row.get(name).map_or(false, |v| !is_blank(v)));
        if populated {
            ColumnPresence::Populated
        } else {
            ColumnPresence::Empty
        }
    }

    /// Add a column holding `value` in every row, or fill its blank cells
    /// if the column already exists
    pub fn fill_column(&mut self, name: &str, value: Value) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
        for row in &mut self.rows {
            let cell = row.entry(name.to_string()).or_insert(Value::Null);
            if is_blank(cell) {
                *cell = value.clone();
            }
        }
    }
}

/// Presence of a column in a raw table, decided once at normalization time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPresence {
    /// The column is not part of the header
    Absent,
    /// The column exists but every cell is null or blank
    Empty,
    /// At least one cell carries a value
    Populated,
}

/// A cell is blank when it is null or a string that is empty after trimming
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
