//! Tests for aggregated views
//! Verifies forecast exclusion, ordering and empty-input behavior

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::aggregation::{
    aggregate, by_category, by_cultivar, cumulative_by_date_and_category, difference,
    percent_ranked, proportion, sankey, summary, top_n, TOP_N,
};
use shared::metrics::{classify_status, compute_percent};
use shared::{AggregationKind, AggregationTable, CultivarRecord, TimelineRecord};

fn record(cultivar: &str, category: &str, forecast: Decimal, received: Decimal) -> CultivarRecord {
    let percent = compute_percent(forecast, received);
    CultivarRecord {
        cultivar: cultivar.into(),
        harvest_forecast: forecast,
        receiving_forecast: forecast,
        received,
        category: category.into(),
        status: classify_status(forecast, received, percent),
        percent,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn empty_input_is_valid_for_every_kind() {
        for kind in AggregationKind::ALL {
            let table = aggregate(kind, &[], &[]);
            assert_eq!(table.kind(), kind);
            assert!(table.is_empty());
        }
    }

    #[test]
    fn tagged_json_shape() {
        let table = aggregate(AggregationKind::TopN, &[record("A", "Pão", Decimal::ONE, Decimal::TEN)], &[]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["kind"], "top_n");
        assert_eq!(json["rows"][0]["cultivar"], "A");
    }

    #[test]
    fn proportion_shares_add_up() {
        let records = [
            record("A", "Pão", Decimal::ZERO, Decimal::from(1)),
            record("B", "Pão", Decimal::ZERO, Decimal::from(3)),
        ];
        let slices = proportion(&records);
        assert_eq!(slices[0].share_percent, Decimal::from(25));
        assert_eq!(slices[1].share_percent, Decimal::from(75));
    }

    #[test]
    fn summary_without_forecast_has_zero_progress() {
        let kpis = summary(&[record("A", "Pão", Decimal::ZERO, Decimal::from(10))]);
        assert_eq!(kpis.overall_progress, Decimal::ZERO);
        assert_eq!(kpis.surplus_cultivars, 1);
    }

    #[test]
    fn dispatcher_matches_direct_calls() {
        let records = [
            record("A", "Pão", Decimal::from(100), Decimal::from(50)),
            record("B", "Melhorador", Decimal::from(100), Decimal::from(150)),
        ];
        assert_eq!(
            aggregate(AggregationKind::Sankey, &records, &[]),
            AggregationTable::Sankey(sankey(&records))
        );
        assert_eq!(
            aggregate(AggregationKind::ByCategoria, &records, &[]),
            AggregationTable::ByCategoria(by_category(&records))
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn record_strategy() -> impl Strategy<Value = CultivarRecord> {
        (
            prop_oneof![Just("TRUNFO"), Just("VELOZ"), Just("TBIO"), Just("ORS")],
            prop_oneof![Just("Pão"), Just("Melhorador"), Just("Brando")],
            prop_oneof![Just(0i64), 1i64..=5000i64],
            0i64..=6000i64,
        )
            .prop_map(|(cultivar, category, forecast, received)| {
                record(cultivar, category, Decimal::from(forecast), Decimal::from(received))
            })
    }

    fn timeline_strategy() -> impl Strategy<Value = TimelineRecord> {
        (
            prop_oneof![Just("Pão"), Just("Melhorador")],
            1u32..=28,
            1i64..=1000i64,
        )
            .prop_map(|(category, day, volume)| TimelineRecord {
                date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                cultivar: "TRUNFO".into(),
                category: category.into(),
                volume_sc: Decimal::from(volume),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Views that compare against the forecast leave out records without one
        #[test]
        fn prop_forecast_views_exclude_zero_forecast(
            records in prop::collection::vec(record_strategy(), 0..30)
        ) {
            let with_forecast: Vec<&CultivarRecord> =
                records.iter().filter(|r| r.receiving_forecast > Decimal::ZERO).collect();

            prop_assert_eq!(difference(&records).len(), with_forecast.len());
            prop_assert_eq!(percent_ranked(&records).len(), with_forecast.len());
            prop_assert_eq!(sankey(&records).edges.len(), with_forecast.len());

            let forecast_total: Decimal = with_forecast.iter().map(|r| r.receiving_forecast).sum();
            let grouped: Decimal = by_cultivar(&records).iter().map(|g| g.total_forecast).sum();
            prop_assert_eq!(grouped, forecast_total);
            prop_assert!(by_cultivar(&records).iter().all(|g| g.total_forecast > Decimal::ZERO));
        }

        /// A cultivar with any forecast keeps every receipt, including rows
        /// without a forecast of their own
        #[test]
        fn prop_by_cultivar_keeps_all_receipts_of_kept_groups(
            records in prop::collection::vec(record_strategy(), 0..30)
        ) {
            for group in by_cultivar(&records) {
                let received: Decimal = records
                    .iter()
                    .filter(|r| r.cultivar == group.cultivar)
                    .map(|r| r.received)
                    .sum();
                prop_assert_eq!(group.total_received, received);
            }
        }

        /// Difference is descending and percent ascending
        #[test]
        fn prop_rankings_are_sorted(records in prop::collection::vec(record_strategy(), 0..30)) {
            let diffs = difference(&records);
            prop_assert!(diffs.windows(2).all(|w| w[0].difference >= w[1].difference));
            let percents = percent_ranked(&records);
            prop_assert!(percents.windows(2).all(|w| w[0].percent <= w[1].percent));
        }

        /// Top N holds at most N rows, the largest receipts, in descending order
        #[test]
        fn prop_top_n(records in prop::collection::vec(record_strategy(), 0..30)) {
            let top = top_n(&records, TOP_N);
            prop_assert_eq!(top.len(), records.len().min(TOP_N));
            prop_assert!(top.windows(2).all(|w| w[0].received >= w[1].received));
            if let Some(last) = top.last() {
                let larger = records.iter().filter(|r| r.received > last.received).count();
                prop_assert!(larger < TOP_N);
            }
        }

        /// The last cumulative point of a category equals its total volume
        #[test]
        fn prop_cumulative_totals(timeline in prop::collection::vec(timeline_strategy(), 0..40)) {
            let points = cumulative_by_date_and_category(&timeline);
            for category in ["Pão", "Melhorador"] {
                let total: Decimal = timeline
                    .iter()
                    .filter(|r| r.category == category)
                    .map(|r| r.volume_sc)
                    .sum();
                let series: Vec<_> = points.iter().filter(|p| p.category == category).collect();
                prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));
                match series.last() {
                    Some(last) => prop_assert_eq!(last.cumulative_volume, total),
                    None => prop_assert_eq!(total, Decimal::ZERO),
                }
            }
        }

        /// Category totals cover every record
        #[test]
        fn prop_category_totals(records in prop::collection::vec(record_strategy(), 0..30)) {
            let received: Decimal = records.iter().map(|r| r.received).sum();
            let grouped: Decimal = by_category(&records).iter().map(|g| g.total_received).sum();
            prop_assert_eq!(grouped, received);
        }
    }
}
