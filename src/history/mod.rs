// In-memory sample history. Deduplicated by timestamp (last write wins);
// bounded by time-windowed pruning on the worker's prune tick.

pub mod aggregation;

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::Sample;

pub struct HistoryStore {
    samples: BTreeMap<DateTime<Utc>, Sample>,
    retention: TimeDelta,
}

impl HistoryStore {
    pub fn new(retention_hours: u32) -> Self {
        Self {
            samples: BTreeMap::new(),
            retention: TimeDelta::hours(i64::from(retention_hours)),
        }
    }

    /// Merges one fetch result. A timestamp already present is replaced by
    /// the incoming sample; empty input is a no-op.
    pub fn merge(&mut self, incoming: Vec<Sample>) {
        for sample in incoming {
            self.samples.insert(sample.timestamp, sample);
        }
    }

    /// All stored samples, ascending by timestamp.
    pub fn samples(&self) -> Vec<Sample> {
        self.samples.values().cloned().collect()
    }

    /// Chronologically last sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.values().next_back()
    }

    /// Evicts samples older than the retention window. Returns the number
    /// of samples removed.
    pub fn prune_old_data(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.retention;
        let len_before = self.samples.len();
        self.samples = self.samples.split_off(&cutoff);
        len_before - self.samples.len()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
