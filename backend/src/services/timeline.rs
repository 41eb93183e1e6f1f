//! Receiving timeline service: daily volumes, imports and sample data

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::timeline::{generate_synthetic_sample, import_events, parse_events, CategoryLookup};
use shared::{RawTable, TimelineRecord};

use crate::config::TimelineConfig;
use crate::error::AppResult;
use crate::store::{RecordStore, TimelineStore};

#[derive(Clone)]
pub struct TimelineService {
    timeline: TimelineStore,
    records: RecordStore,
    settings: TimelineConfig,
}

impl TimelineService {
    pub fn new(timeline: TimelineStore, records: RecordStore, settings: TimelineConfig) -> Self {
        Self {
            timeline,
            records,
            settings,
        }
    }

    /// Canonical timeline as of today
    pub fn get_timeline(&self) -> AppResult<Vec<TimelineRecord>> {
        self.get_timeline_on(Local::now().date_naive())
    }

    /// Canonical timeline; when the store is empty and records exist, a
    /// synthetic sample ending on `today` is generated and persisted first
    pub fn get_timeline_on(&self, today: NaiveDate) -> AppResult<Vec<TimelineRecord>> {
        let timeline = self.timeline.load();
        if !timeline.is_empty() || !self.settings.generate_sample {
            return Ok(timeline);
        }

        let records = self.records.load();
        if records.is_empty() {
            return Ok(timeline);
        }

        let mut rng = match self.settings.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sample = generate_synthetic_sample(&records, today, &mut rng);
        if !sample.is_empty() {
            self.timeline.save(&sample)?;
            tracing::info!(rows = sample.len(), "Generated sample timeline");
        }
        Ok(sample)
    }

    /// Replace the timeline with imported receiving events.
    ///
    /// Nothing is written unless every row parses. Returns the number of
    /// timeline records written.
    pub fn import_timeline(&self, table: RawTable) -> AppResult<usize> {
        let events = parse_events(&table)?;
        let lookup = CategoryLookup::from_records(&self.records.load());
        let records = import_events(&events, &lookup);

        self.timeline.save(&records)?;
        tracing::info!(rows = records.len(), "Timeline imported");
        Ok(records.len())
    }
}
