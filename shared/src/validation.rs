//! Validation and parsing utilities for receiving data

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{ImportError, ImportResult};
use crate::models::RecordColumn;
use crate::types::{is_blank, RawTable};

// ============================================================================
// Column Validations
// ============================================================================

/// Check that every required column is in the header
pub fn validate_required_columns(table: &RawTable, required: &[&str]) -> ImportResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            required: required.iter().map(|name| name.to_string()).collect(),
            missing,
        })
    }
}

/// Check the column set of a bulk record import (Status is optional)
pub fn validate_record_import(table: &RawTable) -> ImportResult<()> {
    let required: Vec<&str> = RecordColumn::REQUIRED_FOR_IMPORT
        .iter()
        .map(|c| c.name())
        .collect();
    validate_required_columns(table, &required)
}

// ============================================================================
// Value Parsing
// ============================================================================

/// Parse a decimal, accepting plain and scientific notation
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Numeric value of a cell, or None when it is blank or not a number
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Text of a cell; null becomes the empty string
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a receiving date; timestamps keep only their date part
pub fn parse_receiving_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Date value of a cell; numbers are read as YYYYMMDD
pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    if is_blank(value) {
        return None;
    }
    match value {
        Value::String(s) => parse_receiving_date(s),
        Value::Number(n) => parse_receiving_date(&n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Field Validations
// ============================================================================

/// Validate a cultivar name entered by hand
pub fn validate_cultivar_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Cultivar name is required");
    }
    Ok(())
}

/// Validate a volume entered by hand (SC)
pub fn validate_volume(volume: Decimal) -> Result<(), &'static str> {
    if volume < Decimal::ZERO {
        return Err("Volume cannot be negative");
    }
    Ok(())
}
