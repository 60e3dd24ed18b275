// Hourly rollup: pure aggregation logic, no store access.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{HourBucket, Sample, hour_floor};

/// Result of one rollup pass: the overall online flag plus hourly buckets
/// in ascending hour order.
#[derive(Debug, Clone)]
pub struct HourlyAggregate {
    pub online: bool,
    pub buckets: Vec<HourBucket>,
}

/// Rolls raw samples into hourly buckets. Samples are walked in ascending
/// timestamp order; within a bucket the online flag follows the last
/// sample merged. The overall flag is the last sorted sample's, which is
/// why empty input returns None instead of a bucket list.
pub fn aggregate_hourly(samples: &[Sample]) -> Option<HourlyAggregate> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Sample> = samples.iter().collect();
    sorted.sort_by_key(|s| s.timestamp);

    let mut hourly: BTreeMap<DateTime<Utc>, HourBucket> = BTreeMap::new();
    for sample in &sorted {
        hourly
            .entry(hour_floor(sample.timestamp))
            .and_modify(|bucket| bucket.merge(sample))
            .or_insert_with(|| HourBucket::open(sample));
    }

    let online = sorted.last().unwrap().online;
    Some(HourlyAggregate {
        online,
        buckets: hourly.into_values().collect(),
    })
}
