//! Tests for the receiving timeline
//! Verifies kg to SC conversion, all-or-nothing imports and sample conservation

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::timeline::{
    generate_synthetic_sample, import_events, parse_events, CategoryLookup, SAMPLE_WINDOW_DAYS,
};
use shared::{kg_to_sc, CultivarRecord, ImportError, RawTable, ReceivingStatus};

fn record(cultivar: &str, category: &str, received: Decimal) -> CultivarRecord {
    CultivarRecord {
        cultivar: cultivar.into(),
        harvest_forecast: Decimal::ZERO,
        receiving_forecast: Decimal::from(1000),
        received,
        category: category.into(),
        status: ReceivingStatus::InProgress,
        percent: Decimal::ZERO,
    }
}

fn events(rows: Vec<Value>) -> RawTable {
    RawTable::from_rows(
        rows.into_iter()
            .map(|row| serde_json::from_value(row).unwrap())
            .collect(),
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn fifteen_tonnes_is_exactly_250_sc() {
        assert_eq!(kg_to_sc(Decimal::from(15000)), Decimal::from(250));
        assert_eq!(kg_to_sc(Decimal::from(15000)).to_string(), "250");
    }

    #[test]
    fn template_example_imports() {
        let table = events(vec![
            json!({"Responsável pelo recebimento": "João Silva", "Data": "2024-01-15", "Turno": "Manhã", "Cultivar": "TRUNFO", "Quantidade (Kg)": 15000}),
            json!({"Responsável pelo recebimento": "Maria Santos", "Data": "2024-01-16", "Turno": "Tarde", "Cultivar": "TRUNFO", "Quantidade (Kg)": 12000}),
            json!({"Responsável pelo recebimento": "Pedro Oliveira", "Data": "2024-01-17", "Turno": "Noite", "Cultivar": "VELOZ", "Quantidade (Kg)": 8000}),
        ]);
        let lookup = CategoryLookup::from_records(&[record("TRUNFO", "Pão", Decimal::ZERO)]);
        let timeline = import_events(&parse_events(&table).unwrap(), &lookup);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].category, "Pão");
        assert_eq!(timeline[1].volume_sc, Decimal::from(200));
        assert_eq!(timeline[2].category, "N/A");
    }

    #[test]
    fn missing_columns_are_reported_together() {
        let table = events(vec![json!({"Date": "2024-01-15", "Cultivar": "TRUNFO"})]);
        match parse_events(&table) {
            Err(ImportError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["Responsible", "Shift", "QuantityKg"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_shift_is_rejected() {
        let table = events(vec![json!({
            "Responsible": "A", "Date": "2024-01-15", "Shift": "Madrugada",
            "Cultivar": "TRUNFO", "QuantityKg": 60
        })]);
        assert!(matches!(
            parse_events(&table),
            Err(ImportError::InvalidShift { row: 1, .. })
        ));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let table = events(vec![json!({
            "Responsible": "A", "Date": "2024-01-15", "Shift": "Manhã",
            "Cultivar": "TRUNFO", "QuantityKg": -60
        })]);
        assert!(matches!(
            parse_events(&table),
            Err(ImportError::InvalidQuantity { row: 1, .. })
        ));
    }

    #[test]
    fn sample_skips_records_without_receipts() {
        let mut rng = StdRng::seed_from_u64(1);
        let sample = generate_synthetic_sample(
            &[record("VELOZ", "Pão", Decimal::ZERO)],
            today(),
            &mut rng,
        );
        assert!(sample.is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Received volumes in SC, up to well past what the window can hold
    fn received_strategy() -> impl Strategy<Value = Decimal> {
        prop_oneof![
            (1i64..=5_000i64).prop_map(Decimal::from),
            (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            (50_000i64..=200_000i64).prop_map(Decimal::from),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// kg to SC is an exact division by 60
        #[test]
        fn prop_kg_to_sc_exact(sc in 0i64..=100_000i64) {
            prop_assert_eq!(kg_to_sc(Decimal::from(sc * 60)), Decimal::from(sc));
        }

        /// Samples add up to the received volume, stay inside the window and
        /// never carry a negative or zero volume
        #[test]
        fn prop_sample_conservation(received in received_strategy(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = generate_synthetic_sample(
                &[record("TRUNFO", "Pão", received)],
                today(),
                &mut rng,
            );

            let total: Decimal = sample.iter().map(|r| r.volume_sc).sum();
            prop_assert_eq!(total, received);

            let start = today() - Duration::days(SAMPLE_WINDOW_DAYS);
            for row in &sample {
                prop_assert!(row.volume_sc > Decimal::ZERO);
                prop_assert!(row.date >= start && row.date <= today());
            }
        }

        /// The same seed gives the same sample
        #[test]
        fn prop_sample_is_repeatable(seed in any::<u64>()) {
            let records = [
                record("TRUNFO", "Pão", Decimal::from(2750)),
                record("VELOZ", "Melhorador", Decimal::from(900)),
            ];
            let first = generate_synthetic_sample(&records, today(), &mut StdRng::seed_from_u64(seed));
            let second = generate_synthetic_sample(&records, today(), &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(first, second);
        }

        /// A single bad date anywhere rejects the whole table
        #[test]
        fn prop_bad_date_rejects_import(len in 1usize..15, bad in 0usize..15) {
            let bad = bad % len;
            let rows = (0..len)
                .map(|i| {
                    let date = if i == bad { "32/13/2024".to_string() } else { "2024-01-15".to_string() };
                    json!({"Responsible": "A", "Date": date, "Shift": "Tarde", "Cultivar": "TRUNFO", "QuantityKg": 120})
                })
                .collect();
            match parse_events(&events(rows)) {
                Err(ImportError::InvalidDate { row, .. }) => prop_assert_eq!(row, bad + 1),
                other => prop_assert!(false, "unexpected result: {:?}", other),
            }
        }
    }
}
