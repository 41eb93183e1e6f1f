//! Read-only aggregated views over the canonical record and timeline sets
//!
//! Every view accepts an empty input and returns an empty result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{
    AchievementBand, AggregationKind, AggregationTable, CategoryVolume, CultivarDifference,
    CultivarPercent, CultivarRecord, CultivarVolume, CumulativePoint, PerformanceBand,
    ProportionSlice, ReceivingSummary, SankeyEdge, SankeyFlow, TimelineRecord, TopCultivar,
};

/// Number of cultivars in the ranking view
pub const TOP_N: usize = 10;

/// Forecast and received totals per cultivar, ordered by cultivar.
/// Cultivars whose summed forecast is not positive are left out.
pub fn by_cultivar(records: &[CultivarRecord]) -> Vec<CultivarVolume> {
    let mut groups: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.cultivar.as_str()).or_default();
        entry.0 = entry.0.saturating_add(record.receiving_forecast);
        entry.1 = entry.1.saturating_add(record.received);
    }
    groups
        .into_iter()
        .filter(|(_, (total_forecast, _))| *total_forecast > Decimal::ZERO)
        .map(|(cultivar, (total_forecast, total_received))| CultivarVolume {
            cultivar: cultivar.to_string(),
            total_forecast,
            total_received,
        })
        .collect()
}

/// Forecast and received totals per category, ordered by category
pub fn by_category(records: &[CultivarRecord]) -> Vec<CategoryVolume> {
    let mut groups: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.category.as_str()).or_default();
        entry.0 = entry.0.saturating_add(record.receiving_forecast);
        entry.1 = entry.1.saturating_add(record.received);
    }
    groups
        .into_iter()
        .map(|(category, (total_forecast, total_received))| CategoryVolume {
            category: category.to_string(),
            total_forecast,
            total_received,
        })
        .collect()
}

/// Cultivar → status flows weighted by receiving forecast
pub fn sankey(records: &[CultivarRecord]) -> SankeyFlow {
    let valid: Vec<&CultivarRecord> = records.iter().filter(|r| r.has_valid_forecast()).collect();

    let mut cultivars: Vec<String> = Vec::new();
    let mut statuses: Vec<String> = Vec::new();
    for record in &valid {
        if !cultivars.contains(&record.cultivar) {
            cultivars.push(record.cultivar.clone());
        }
        let status = record.status.label().to_string();
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }

    let index_of = |nodes: &[String], name: &str| nodes.iter().position(|n| n == name).unwrap_or(0);
    let edges = valid
        .iter()
        .map(|record| SankeyEdge {
            source: index_of(&cultivars, &record.cultivar),
            target: cultivars.len() + index_of(&statuses, record.status.label()),
            cultivar: record.cultivar.clone(),
            status: record.status.label().to_string(),
            value: record.receiving_forecast,
        })
        .collect();

    let mut nodes = cultivars;
    nodes.extend(statuses);
    SankeyFlow { nodes, edges }
}

/// Received minus forecast per record, largest surplus first
pub fn difference(records: &[CultivarRecord]) -> Vec<CultivarDifference> {
    let mut rows: Vec<CultivarDifference> = records
        .iter()
        .filter(|r| r.has_valid_forecast())
        .map(|r| {
            let difference = r.difference();
            CultivarDifference {
                cultivar: r.cultivar.clone(),
                difference,
                band: PerformanceBand::from_difference(difference),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.difference.cmp(&a.difference));
    rows
}

/// Percent of forecast per record, lowest first
pub fn percent_ranked(records: &[CultivarRecord]) -> Vec<CultivarPercent> {
    let mut rows: Vec<CultivarPercent> = records
        .iter()
        .filter(|r| r.has_valid_forecast())
        .map(|r| CultivarPercent {
            cultivar: r.cultivar.clone(),
            percent: r.percent,
            band: AchievementBand::from_percent(r.percent),
        })
        .collect();
    rows.sort_by(|a, b| a.percent.cmp(&b.percent));
    rows
}

/// The `n` records with the most volume received; ties keep input order
pub fn top_n(records: &[CultivarRecord], n: usize) -> Vec<TopCultivar> {
    let mut ranked: Vec<&CultivarRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.received.cmp(&a.received));
    ranked
        .into_iter()
        .take(n)
        .map(|r| TopCultivar {
            cultivar: r.cultivar.clone(),
            received: r.received,
        })
        .collect()
}

/// Daily volume per (category, date) with a running total per category,
/// ordered by category then date
pub fn cumulative_by_date_and_category(timeline: &[TimelineRecord]) -> Vec<CumulativePoint> {
    let mut daily: BTreeMap<&str, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
    for record in timeline {
        let day = daily
            .entry(record.category.as_str())
            .or_default()
            .entry(record.date)
            .or_default();
        *day = day.saturating_add(record.volume_sc);
    }

    let mut points = Vec::new();
    for (category, days) in daily {
        let mut running = Decimal::ZERO;
        for (date, daily_volume) in days {
            running = running.saturating_add(daily_volume);
            points.push(CumulativePoint {
                category: category.to_string(),
                date,
                daily_volume,
                cumulative_volume: running,
            });
        }
    }
    points
}

/// Each cultivar's share of the total received volume
pub fn proportion(records: &[CultivarRecord]) -> Vec<ProportionSlice> {
    let mut groups: BTreeMap<&str, Decimal> = BTreeMap::new();
    for record in records.iter().filter(|r| r.received > Decimal::ZERO) {
        let entry = groups.entry(record.cultivar.as_str()).or_default();
        *entry = entry.saturating_add(record.received);
    }
    let total = saturating_sum(groups.values().copied());

    groups
        .into_iter()
        .map(|(cultivar, received)| ProportionSlice {
            cultivar: cultivar.to_string(),
            received,
            share_percent: share(received, total),
        })
        .collect()
}

/// `part` as a percentage of `total`, rounded to two places; 0 when the
/// ratio cannot be represented
fn share(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Sum that clamps at the representable range instead of overflowing
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Headline totals of the receiving report
pub fn summary(records: &[CultivarRecord]) -> ReceivingSummary {
    let total_forecast = saturating_sum(records.iter().map(|r| r.receiving_forecast));
    let total_received = saturating_sum(records.iter().map(|r| r.received));
    let overall_progress = if total_forecast > Decimal::ZERO {
        share(total_received, total_forecast)
    } else {
        Decimal::ZERO
    };

    let surplus: Vec<&CultivarRecord> = records.iter().filter(|r| r.is_surplus()).collect();
    let total_surplus = saturating_sum(surplus.iter().map(|r| r.difference()));
    let total_deficit = saturating_sum(
        records
            .iter()
            .filter(|r| r.is_deficit())
            .map(|r| -r.difference()),
    );

    ReceivingSummary {
        total_forecast,
        total_received,
        overall_progress,
        record_count: records.len(),
        total_surplus,
        total_deficit,
        surplus_cultivars: surplus.len(),
    }
}

/// Build the requested view
pub fn aggregate(
    kind: AggregationKind,
    records: &[CultivarRecord],
    timeline: &[TimelineRecord],
) -> AggregationTable {
    match kind {
        AggregationKind::ByCultivar => AggregationTable::ByCultivar(by_cultivar(records)),
        AggregationKind::ByCategoria => AggregationTable::ByCategoria(by_category(records)),
        AggregationKind::Sankey => AggregationTable::Sankey(sankey(records)),
        AggregationKind::Difference => AggregationTable::Difference(difference(records)),
        AggregationKind::PercentRanked => AggregationTable::PercentRanked(percent_ranked(records)),
        AggregationKind::TopN => AggregationTable::TopN(top_n(records, TOP_N)),
        AggregationKind::Cumulative => {
            AggregationTable::Cumulative(cumulative_by_date_and_category(timeline))
        }
        AggregationKind::Proportion => AggregationTable::Proportion(proportion(records)),
        AggregationKind::Summary => AggregationTable::Summary(summary(records)),
    }
}
