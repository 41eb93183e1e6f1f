//! File-backed persistence for cultivar records and the receiving timeline
//!
//! Stores exchange whole tables: every write replaces the backing data.

pub mod csv;
pub mod records;
pub mod timeline;

use shared::RawTable;
use thiserror::Error;

pub use self::csv::CsvRowStore;
pub use records::RecordStore;
pub use timeline::TimelineStore;

/// Persistence failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw row persistence behind the record and timeline stores
pub trait RowStore: Send + Sync {
    /// Read the stored table; `None` when nothing has been stored yet
    fn read_rows(&self) -> StoreResult<Option<RawTable>>;

    /// Replace the stored table
    fn write_rows(&self, table: &RawTable) -> StoreResult<()>;
}
