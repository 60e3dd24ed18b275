// Hourly bucket: running average over one calendar hour plus the online
// flag of the last sample merged into it.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::Sample;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour_start: DateTime<Utc>,
    pub total_latency_ms: f64,
    pub count: u32,
    pub avg_latency_ms: f64,
    pub online: bool,
}

impl HourBucket {
    /// Opens a bucket from the first sample seen in its hour.
    pub fn open(sample: &Sample) -> Self {
        Self {
            hour_start: hour_floor(sample.timestamp),
            total_latency_ms: sample.latency_ms,
            count: 1,
            avg_latency_ms: sample.latency_ms,
            online: sample.online,
        }
    }

    /// Folds one more sample in: the average is recomputed on every merge,
    /// and the online flag follows the last sample merged.
    pub fn merge(&mut self, sample: &Sample) {
        self.total_latency_ms += sample.latency_ms;
        self.count += 1;
        self.avg_latency_ms = self.total_latency_ms / f64::from(self.count);
        self.online = sample.online;
    }

    /// Hour-boundary key with zeroed minutes/seconds and a trailing UTC
    /// marker, e.g. "2024-01-01T10:00:00Z".
    pub fn hour_key(&self) -> String {
        self.hour_start.format("%Y-%m-%dT%H:00:00Z").to_string()
    }
}

/// Truncates a timestamp to its hour boundary.
pub fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}
