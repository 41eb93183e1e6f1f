//! Aggregated views consumed by charts and reports

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kinds of aggregation a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    ByCultivar,
    ByCategoria,
    Sankey,
    Difference,
    PercentRanked,
    TopN,
    Cumulative,
    Proportion,
    Summary,
}

impl AggregationKind {
    pub const ALL: [AggregationKind; 9] = [
        AggregationKind::ByCultivar,
        AggregationKind::ByCategoria,
        AggregationKind::Sankey,
        AggregationKind::Difference,
        AggregationKind::PercentRanked,
        AggregationKind::TopN,
        AggregationKind::Cumulative,
        AggregationKind::Proportion,
        AggregationKind::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::ByCultivar => "by_cultivar",
            AggregationKind::ByCategoria => "by_categoria",
            AggregationKind::Sankey => "sankey",
            AggregationKind::Difference => "difference",
            AggregationKind::PercentRanked => "percent_ranked",
            AggregationKind::TopN => "top_n",
            AggregationKind::Cumulative => "cumulative",
            AggregationKind::Proportion => "proportion",
            AggregationKind::Summary => "summary",
        }
    }

    /// Whether the view is built from the timeline instead of the records
    pub fn uses_timeline(&self) -> bool {
        matches!(self, AggregationKind::Cumulative)
    }
}

impl std::str::FromStr for AggregationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown aggregation kind '{}'", s))
    }
}

impl std::fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast vs. received totals for one cultivar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivarVolume {
    pub cultivar: String,
    pub total_forecast: Decimal,
    pub total_received: Decimal,
}

/// Forecast vs. received totals for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVolume {
    pub category: String,
    pub total_forecast: Decimal,
    pub total_received: Decimal,
}

/// One cultivar → status flow weighted by forecast volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyEdge {
    pub source: usize,
    pub target: usize,
    pub cultivar: String,
    pub status: String,
    pub value: Decimal,
}

/// Sankey diagram: cultivar nodes first, then status nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyFlow {
    pub nodes: Vec<String>,
    pub edges: Vec<SankeyEdge>,
}

/// Where a cultivar stands against its forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Above,
    OnTarget,
    Below,
}

impl PerformanceBand {
    pub fn from_difference(difference: Decimal) -> Self {
        if difference > Decimal::ZERO {
            PerformanceBand::Above
        } else if difference < Decimal::ZERO {
            PerformanceBand::Below
        } else {
            PerformanceBand::OnTarget
        }
    }
}

/// Achievement band of a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementBand {
    /// 100% or more
    Reached,
    /// 50% up to 100%
    Halfway,
    Behind,
}

impl AchievementBand {
    pub fn from_percent(percent: Decimal) -> Self {
        if percent >= Decimal::ONE_HUNDRED {
            AchievementBand::Reached
        } else if percent >= Decimal::from(50) {
            AchievementBand::Halfway
        } else {
            AchievementBand::Behind
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivarDifference {
    pub cultivar: String,
    pub difference: Decimal,
    pub band: PerformanceBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivarPercent {
    pub cultivar: String,
    pub percent: Decimal,
    pub band: AchievementBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCultivar {
    pub cultivar: String,
    pub received: Decimal,
}

/// Daily and running volume of a category on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub category: String,
    pub date: NaiveDate,
    pub daily_volume: Decimal,
    pub cumulative_volume: Decimal,
}

/// Share of the total received volume held by one cultivar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionSlice {
    pub cultivar: String,
    pub received: Decimal,
    pub share_percent: Decimal,
}

/// Headline figures for the receiving report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivingSummary {
    pub total_forecast: Decimal,
    pub total_received: Decimal,
    pub overall_progress: Decimal,
    pub record_count: usize,
    pub total_surplus: Decimal,
    pub total_deficit: Decimal,
    pub surplus_cultivars: usize,
}

/// Result of an aggregation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum AggregationTable {
    ByCultivar(Vec<CultivarVolume>),
    ByCategoria(Vec<CategoryVolume>),
    Sankey(SankeyFlow),
    Difference(Vec<CultivarDifference>),
    PercentRanked(Vec<CultivarPercent>),
    TopN(Vec<TopCultivar>),
    Cumulative(Vec<CumulativePoint>),
    Proportion(Vec<ProportionSlice>),
    Summary(ReceivingSummary),
}

impl AggregationTable {
    pub fn kind(&self) -> AggregationKind {
        match self {
            AggregationTable::ByCultivar(_) => AggregationKind::ByCultivar,
            AggregationTable::ByCategoria(_) => AggregationKind::ByCategoria,
            AggregationTable::Sankey(_) => AggregationKind::Sankey,
            AggregationTable::Difference(_) => AggregationKind::Difference,
            AggregationTable::PercentRanked(_) => AggregationKind::PercentRanked,
            AggregationTable::TopN(_) => AggregationKind::TopN,
            AggregationTable::Cumulative(_) => AggregationKind::Cumulative,
            AggregationTable::Proportion(_) => AggregationKind::Proportion,
            AggregationTable::Summary(_) => AggregationKind::Summary,
        }
    }

    /// Number of rows; the summary always counts as one
    pub fn len(&self) -> usize {
        match self {
            AggregationTable::ByCultivar(rows) => rows.len(),
            AggregationTable::ByCategoria(rows) => rows.len(),
            AggregationTable::Sankey(flow) => flow.edges.len(),
            AggregationTable::Difference(rows) => rows.len(),
            AggregationTable::PercentRanked(rows) => rows.len(),
            AggregationTable::TopN(rows) => rows.len(),
            AggregationTable::Cumulative(rows) => rows.len(),
            AggregationTable::Proportion(rows) => rows.len(),
            AggregationTable::Summary(_) => 1,
        }
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        match self {
            AggregationTable::Summary(summary) => summary.record_count == 0,
            _ => self.len() == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_path_segment() {
        for kind in AggregationKind::ALL {
            assert_eq!(kind.as_str().parse::<AggregationKind>(), Ok(kind));
        }
        assert!("pie".parse::<AggregationKind>().is_err());
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(AchievementBand::from_percent(Decimal::from(100)), AchievementBand::Reached);
        assert_eq!(AchievementBand::from_percent(Decimal::from(50)), AchievementBand::Halfway);
        assert_eq!(AchievementBand::from_percent(Decimal::new(4999, 2)), AchievementBand::Behind);
        assert_eq!(PerformanceBand::from_difference(Decimal::ZERO), PerformanceBand::OnTarget);
        assert_eq!(PerformanceBand::from_difference(Decimal::from(-1)), PerformanceBand::Below);
    }
}
