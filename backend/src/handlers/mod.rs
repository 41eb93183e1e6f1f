//! HTTP handlers for the Wheat Receiving Tracker API

pub mod dashboard;
pub mod health;
pub mod records;
pub mod reporting;
pub mod timeline;

use serde::{Deserialize, Serialize};
use shared::{RawRow, RawTable};

pub use dashboard::get_dashboard_config;
pub use health::health_check;
pub use records::{import_records, list_records, register_record, update_records};
pub use reporting::get_aggregation;
pub use timeline::{get_timeline, import_timeline};

/// Tabular request body. `columns` may be omitted, in which case it is
/// taken from the row keys.
#[derive(Debug, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

impl TablePayload {
    pub fn into_table(self) -> RawTable {
        if self.columns.is_empty() {
            RawTable::from_rows(self.rows)
        } else {
            RawTable {
                columns: self.columns,
                rows: self.rows,
            }
        }
    }
}

/// Outcome of a bulk import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub records_processed: usize,
}
