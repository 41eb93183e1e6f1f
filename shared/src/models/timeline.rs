//! Receiving timeline models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kilograms per SC (saco de colheita)
pub const KG_PER_SC: u32 = 60;

/// Columns of the persisted timeline store
pub const TIMELINE_RECORD_COLUMNS: [&str; 4] = ["Data", "Cultivar", "Categoria", "Volume_SC"];

/// Work shift in which a delivery was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    /// Parse a shift name in Portuguese or English, ignoring case
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "manhã" | "manha" | "morning" => Some(Shift::Morning),
            "tarde" | "afternoon" => Some(Shift::Afternoon),
            "noite" | "night" => Some(Shift::Night),
            _ => None,
        }
    }
}

/// Raw receiving columns of a timeline import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineColumn {
    Responsible,
    Date,
    Shift,
    Cultivar,
    QuantityKg,
}

impl TimelineColumn {
    pub const REQUIRED: [TimelineColumn; 5] = [
        TimelineColumn::Responsible,
        TimelineColumn::Date,
        TimelineColumn::Shift,
        TimelineColumn::Cultivar,
        TimelineColumn::QuantityKg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimelineColumn::Responsible => "Responsible",
            TimelineColumn::Date => "Date",
            TimelineColumn::Shift => "Shift",
            TimelineColumn::Cultivar => "Cultivar",
            TimelineColumn::QuantityKg => "QuantityKg",
        }
    }

    /// Header used by the Portuguese receiving template
    pub fn template_name(self) -> &'static str {
        match self {
            TimelineColumn::Responsible => "Responsável pelo recebimento",
            TimelineColumn::Date => "Data",
            TimelineColumn::Shift => "Turno",
            TimelineColumn::Cultivar => "Cultivar",
            TimelineColumn::QuantityKg => "Quantidade (Kg)",
        }
    }
}

/// One delivery as logged at the receiving point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub responsible: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub cultivar: String,
    pub quantity_kg: Decimal,
}

/// Canonical timeline entry: volume in SC received for a cultivar on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Cultivar")]
    pub cultivar: String,
    /// Category joined from the record set at import time
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Volume_SC")]
    pub volume_sc: Decimal,
}

/// Convert kilograms to SC, without trailing fractional zeros
pub fn kg_to_sc(quantity_kg: Decimal) -> Decimal {
    (quantity_kg / Decimal::from(KG_PER_SC)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_parses_both_languages() {
        assert_eq!(Shift::parse("Manhã"), Some(Shift::Morning));
        assert_eq!(Shift::parse(" tarde "), Some(Shift::Afternoon));
        assert_eq!(Shift::parse("NIGHT"), Some(Shift::Night));
        assert_eq!(Shift::parse("Madrugada"), None);
    }

    #[test]
    fn kg_conversion_is_exact() {
        assert_eq!(kg_to_sc(Decimal::from(15000)), Decimal::from(250));
        assert_eq!(kg_to_sc(Decimal::from(12000)), Decimal::from(200));
        assert_eq!(kg_to_sc(Decimal::new(90, 0)), Decimal::new(15, 1));
    }
}
