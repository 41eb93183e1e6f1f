//! Percentage-of-forecast and status derivation

use rust_decimal::Decimal;

use crate::models::{CultivarRecord, NormalizedRecordSet, ReceivingStatus};
use crate::types::ColumnPresence;

/// Status given to rows left blank in a partially filled Status column
pub const DEFAULT_STATUS: ReceivingStatus = ReceivingStatus::InProgress;

/// Received volume as a percentage of the receiving forecast, rounded to
/// two places. A zero forecast yields 0.
pub fn compute_percent(receiving_forecast: Decimal, received: Decimal) -> Decimal {
    if receiving_forecast.is_zero() {
        return Decimal::ZERO;
    }
    received
        .checked_div(receiving_forecast)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Automatic status rule. The forecast check comes first, so a record with
/// no forecast is `InvalidForecast` whatever it received.
pub fn classify_status(
    receiving_forecast: Decimal,
    received: Decimal,
    percent: Decimal,
) -> ReceivingStatus {
    if receiving_forecast.is_zero() {
        ReceivingStatus::InvalidForecast
    } else if percent >= Decimal::ONE_HUNDRED {
        ReceivingStatus::Ok
    } else if received > Decimal::ZERO {
        ReceivingStatus::InProgress
    } else {
        ReceivingStatus::Pending
    }
}

/// Derive percent and status for every record.
///
/// Statuses are computed only when the Status column was absent or blank in
/// every row. Once any row carries a status the whole column is treated as
/// user-managed: existing values are kept and blank cells get
/// [`DEFAULT_STATUS`].
pub fn derive_metrics(set: NormalizedRecordSet) -> Vec<CultivarRecord> {
    let compute_status = set.status_presence != ColumnPresence::Populated;

    set.records
        .into_iter()
        .map(|record| {
            let percent = compute_percent(record.receiving_forecast, record.received);
            let status = if compute_status {
                classify_status(record.receiving_forecast, record.received, percent)
            } else {
                record.status.unwrap_or(DEFAULT_STATUS)
            };
            CultivarRecord {
                cultivar: record.cultivar,
                harvest_forecast: record.harvest_forecast,
                receiving_forecast: record.receiving_forecast,
                received: record.received,
                category: record.category,
                status,
                percent,
            }
        })
        .collect()
}
