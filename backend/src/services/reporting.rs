//! Reporting service for aggregated views and CSV export

use serde::Serialize;
use shared::aggregation::aggregate;
use shared::{AggregationKind, AggregationTable};

use crate::error::{AppError, AppResult};
use crate::services::TimelineService;
use crate::store::RecordStore;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    records: RecordStore,
    timeline: TimelineService,
}

impl ReportingService {
    pub fn new(records: RecordStore, timeline: TimelineService) -> Self {
        Self { records, timeline }
    }

    /// Build one aggregated view over the current records and timeline
    pub fn get_aggregation(&self, kind: AggregationKind) -> AppResult<AggregationTable> {
        let records = self.records.load();
        let timeline = if kind.uses_timeline() {
            self.timeline.get_timeline()?
        } else {
            Vec::new()
        };

        let table = aggregate(kind, &records, &timeline);
        tracing::debug!(kind = %kind, rows = table.len(), "Built aggregation");
        Ok(table)
    }

    /// Render an aggregated view as CSV; the sankey exports its edges
    pub fn table_to_csv(table: &AggregationTable) -> AppResult<String> {
        match table {
            AggregationTable::ByCultivar(rows) => Self::export_to_csv(rows),
            AggregationTable::ByCategoria(rows) => Self::export_to_csv(rows),
            AggregationTable::Sankey(flow) => Self::export_to_csv(&flow.edges),
            AggregationTable::Difference(rows) => Self::export_to_csv(rows),
            AggregationTable::PercentRanked(rows) => Self::export_to_csv(rows),
            AggregationTable::TopN(rows) => Self::export_to_csv(rows),
            AggregationTable::Cumulative(rows) => Self::export_to_csv(rows),
            AggregationTable::Proportion(rows) => Self::export_to_csv(rows),
            AggregationTable::Summary(summary) => Self::export_to_csv(std::slice::from_ref(summary)),
        }
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
