//! Cultivar receiving record models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ColumnPresence, RawRow, RawTable};

/// Placeholder for text columns missing from the input
pub const NOT_AVAILABLE: &str = "N/A";

/// Derived percentage column name
pub const PERCENT_COLUMN: &str = "%";

/// Canonical columns of the record store, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordColumn {
    Cultivar,
    HarvestForecast,
    ReceivingForecast,
    Received,
    Category,
    Status,
}

impl RecordColumn {
    pub const ALL: [RecordColumn; 6] = [
        RecordColumn::Cultivar,
        RecordColumn::HarvestForecast,
        RecordColumn::ReceivingForecast,
        RecordColumn::Received,
        RecordColumn::Category,
        RecordColumn::Status,
    ];

    /// Columns a bulk import must carry; Status is optional
    pub const REQUIRED_FOR_IMPORT: [RecordColumn; 5] = [
        RecordColumn::Cultivar,
        RecordColumn::HarvestForecast,
        RecordColumn::ReceivingForecast,
        RecordColumn::Received,
        RecordColumn::Category,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecordColumn::Cultivar => "Cultivar",
            RecordColumn::HarvestForecast => "Prev_Colheita",
            RecordColumn::ReceivingForecast => "Prev_Receb",
            RecordColumn::Received => "Recepcao",
            RecordColumn::Category => "Categoria",
            RecordColumn::Status => "Status",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            RecordColumn::HarvestForecast | RecordColumn::ReceivingForecast | RecordColumn::Received
        )
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

/// Receiving status of a cultivar.
///
/// The four computed states serialize to their dashboard labels; any other
/// text is a manual override and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReceivingStatus {
    /// Received volume reached the forecast
    Ok,
    /// Some volume received, forecast not reached yet
    InProgress,
    /// Nothing received yet
    Pending,
    /// No receiving forecast to compare against
    InvalidForecast,
    /// Free-text status entered by a user
    Custom(String),
}

impl ReceivingStatus {
    pub fn label(&self) -> &str {
        match self {
            ReceivingStatus::Ok => "OK",
            ReceivingStatus::InProgress => "Em Andamento",
            ReceivingStatus::Pending => "Falta Receber",
            ReceivingStatus::InvalidForecast => "Prev. Inválida",
            ReceivingStatus::Custom(text) => text,
        }
    }

    /// Parse a status cell; blank text means "no status"
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::from(text.to_string()))
        }
    }
}

impl From<String> for ReceivingStatus {
    fn from(text: String) -> Self {
        match text.trim() {
            "OK" => ReceivingStatus::Ok,
            "Em Andamento" | "EmAndamento" => ReceivingStatus::InProgress,
            "Falta Receber" | "FaltaReceber" => ReceivingStatus::Pending,
            "Prev. Inválida" | "PrevInvalida" => ReceivingStatus::InvalidForecast,
            trimmed => ReceivingStatus::Custom(trimmed.to_string()),
        }
    }
}

impl From<ReceivingStatus> for String {
    fn from(status: ReceivingStatus) -> Self {
        match status {
            ReceivingStatus::Custom(text) => text,
            other => other.label().to_string(),
        }
    }
}

impl std::fmt::Display for ReceivingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A record after column defaults and type coercion, before metrics
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub cultivar: String,
    pub harvest_forecast: Decimal,
    pub receiving_forecast: Decimal,
    pub received: Decimal,
    pub category: String,
    pub status: Option<ReceivingStatus>,
}

/// Normalized records plus the Status column presence seen at load time
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecordSet {
    pub records: Vec<NormalizedRecord>,
    pub status_presence: ColumnPresence,
}

impl NormalizedRecordSet {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            status_presence: ColumnPresence::Absent,
        }
    }
}

/// Canonical cultivar record with derived percentage and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivarRecord {
    #[serde(rename = "Cultivar")]
    pub cultivar: String,
    /// Planned harvest volume (SC)
    #[serde(rename = "Prev_Colheita")]
    pub harvest_forecast: Decimal,
    /// Planned receiving volume (SC)
    #[serde(rename = "Prev_Receb")]
    pub receiving_forecast: Decimal,
    /// Volume actually received (SC)
    #[serde(rename = "Recepcao")]
    pub received: Decimal,
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Status")]
    pub status: ReceivingStatus,
    /// Received as a percentage of the receiving forecast
    #[serde(rename = "%")]
    pub percent: Decimal,
}

/// Canonical record set: the normalized, schema-complete records
pub type CanonicalRecordSet = Vec<CultivarRecord>;

impl CultivarRecord {
    /// Received minus forecast; positive means surplus
    pub fn difference(&self) -> Decimal {
        self.received.saturating_sub(self.receiving_forecast)
    }

    /// Whether the record takes part in forecast comparisons
    pub fn has_valid_forecast(&self) -> bool {
        self.receiving_forecast > Decimal::ZERO
    }

    pub fn is_surplus(&self) -> bool {
        self.received > self.receiving_forecast
    }

    pub fn is_deficit(&self) -> bool {
        self.received < self.receiving_forecast
    }

    /// Storage row holding only the canonical columns
    pub fn to_raw_row(&self) -> RawRow {
        let mut row = RawRow::new();
        row.insert(RecordColumn::Cultivar.name().into(), Value::String(self.cultivar.clone()));
        row.insert(
            RecordColumn::HarvestForecast.name().into(),
            Value::String(self.harvest_forecast.to_string()),
        );
        row.insert(
            RecordColumn::ReceivingForecast.name().into(),
            Value::String(self.receiving_forecast.to_string()),
        );
        row.insert(
            RecordColumn::Received.name().into(),
            Value::String(self.received.to_string()),
        );
        row.insert(RecordColumn::Category.name().into(), Value::String(self.category.clone()));
        row.insert(
            RecordColumn::Status.name().into(),
            Value::String(self.status.label().to_string()),
        );
        row
    }
}

/// Convert canonical records back to a raw table in storage layout
pub fn records_to_table(records: &[CultivarRecord]) -> RawTable {
    RawTable {
        columns: RecordColumn::names().into_iter().map(String::from).collect(),
        rows: records.iter().map(CultivarRecord::to_raw_row).collect(),
    }
}

/// Input for registering a single cultivar
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRecordInput {
    pub cultivar: String,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub prev_colheita: Option<Decimal>,
    #[serde(default)]
    pub prev_receb: Option<Decimal>,
    #[serde(default)]
    pub recepcao: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in [
            ReceivingStatus::Ok,
            ReceivingStatus::InProgress,
            ReceivingStatus::Pending,
            ReceivingStatus::InvalidForecast,
        ] {
            let text: String = status.clone().into();
            assert_eq!(ReceivingStatus::from(text), status);
        }
    }

    #[test]
    fn compact_status_spellings_are_accepted() {
        assert_eq!(ReceivingStatus::from("EmAndamento".to_string()), ReceivingStatus::InProgress);
        assert_eq!(ReceivingStatus::from("PrevInvalida".to_string()), ReceivingStatus::InvalidForecast);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = ReceivingStatus::from("Aguardando laudo".to_string());
        assert_eq!(status, ReceivingStatus::Custom("Aguardando laudo".into()));
        assert_eq!(status.label(), "Aguardando laudo");
    }

    #[test]
    fn custom_status_is_trimmed_once() {
        let status = ReceivingStatus::from("  Aguardando laudo \t".to_string());
        assert_eq!(status, ReceivingStatus::Custom("Aguardando laudo".into()));
        assert_eq!(String::from(status), "Aguardando laudo");
    }

    #[test]
    fn blank_status_parses_to_none() {
        assert_eq!(ReceivingStatus::parse("   "), None);
        assert_eq!(ReceivingStatus::parse("OK"), Some(ReceivingStatus::Ok));
    }

    #[test]
    fn record_serializes_with_dashboard_column_names() {
        let record = CultivarRecord {
            cultivar: "TRUNFO".into(),
            harvest_forecast: Decimal::from(1200),
            receiving_forecast: Decimal::from(1000),
            received: Decimal::from(400),
            category: "Pão".into(),
            status: ReceivingStatus::InProgress,
            percent: Decimal::from(40),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Cultivar"], "TRUNFO");
        assert_eq!(json["Status"], "Em Andamento");
        assert!(json.get("%").is_some());
        assert_eq!(record.difference(), Decimal::from(-600));
        assert!(record.is_deficit());
    }
}
