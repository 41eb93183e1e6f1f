//! Errors raised by the strict import tier

use thiserror::Error;

/// Reasons a bulk or timeline import is rejected as a whole
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("missing required columns {missing:?}; the file must have the columns: {}", required.join(", "))]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("invalid date '{value}' in row {row}; use the YYYY-MM-DD format")]
    InvalidDate { row: usize, value: String },

    #[error("invalid quantity '{value}' in row {row}")]
    InvalidQuantity { row: usize, value: String },

    #[error("invalid shift '{value}' in row {row}; use Manhã, Tarde or Noite")]
    InvalidShift { row: usize, value: String },
}

impl ImportError {
    /// Column the error refers to, when there is a single one
    pub fn field(&self) -> Option<&str> {
        match self {
            ImportError::MissingColumns { .. } => None,
            ImportError::InvalidDate { .. } => Some("Date"),
            ImportError::InvalidQuantity { .. } => Some("QuantityKg"),
            ImportError::InvalidShift { .. } => Some("Shift"),
        }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
