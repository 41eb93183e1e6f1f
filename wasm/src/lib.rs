//! WebAssembly module for the Wheat Receiving Tracker
//!
//! Provides client-side computation for:
//! - Receiving percentage against forecast
//! - Status classification
//! - Kilogram to SC conversion
//! - Import column validation

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::metrics::{classify_status, compute_percent};
use shared::{kg_to_sc, validate_record_import, RawTable};

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

/// Received volume as a percentage of the receiving forecast
#[wasm_bindgen]
pub fn calculate_receiving_percent(prev_receb: f64, recepcao: f64) -> f64 {
    compute_percent(to_decimal(prev_receb), to_decimal(recepcao))
        .to_f64()
        .unwrap_or(0.0)
}

/// Status label the server would compute for these volumes
#[wasm_bindgen]
pub fn classify_receiving_status(prev_receb: f64, recepcao: f64) -> String {
    let forecast = to_decimal(prev_receb);
    let received = to_decimal(recepcao);
    let percent = compute_percent(forecast, received);
    classify_status(forecast, received, percent).to_string()
}

/// Convert kilograms to SC (60 kg sacks)
#[wasm_bindgen]
pub fn convert_kg_to_sc(kg: f64) -> f64 {
    kg_to_sc(to_decimal(kg)).to_f64().unwrap_or(0.0)
}

/// Check that a spreadsheet header carries every column a record import needs
#[wasm_bindgen]
pub fn validate_record_columns(columns_json: &str) -> Result<bool, JsValue> {
    let columns: Vec<String> = serde_json::from_str(columns_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid columns JSON: {}", e)))?;

    let table = RawTable {
        columns,
        rows: Vec::new(),
    };
    Ok(validate_record_import(&table).is_ok())
}
