// Shared test helpers

use mando::models::{Sample, parse_timestamp};

pub fn sample(ts: &str, latency_ms: f64, online: bool) -> Sample {
    Sample {
        timestamp: parse_timestamp(ts).expect("test timestamp"),
        latency_ms,
        online,
    }
}
