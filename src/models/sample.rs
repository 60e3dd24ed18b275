// Raw sample model. Wire quirks (string-typed online flag, naive
// timestamps) are normalized here and nowhere else.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level document returned by the monitor endpoint. A response without
/// a `data` field is malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    pub data: Vec<Sample>,
}

/// One timestamped latency/health observation of the monitored service.
/// The timestamp doubles as the sample's identity: re-fetching it replaces
/// the stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "de_latency")]
    pub latency_ms: f64,
    #[serde(deserialize_with = "de_online")]
    pub online: bool,
}

/// Accepts RFC-3339 or a naive ISO-8601 datetime (assumed UTC).
pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")?;
    Ok(naive.and_utc())
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

fn de_latency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if !v.is_finite() || v < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "latency_ms must be a non-negative number, got {v}"
        )));
    }
    Ok(v)
}

/// The endpoint sends the online flag as the string literal "true" (or
/// anything else, meaning offline). Our own serialized output uses a real
/// bool, so both are accepted on the way in.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBool {
    Bool(bool),
    Text(String),
}

fn de_online<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireBool::deserialize(deserializer)? {
        WireBool::Bool(b) => b,
        WireBool::Text(s) => s == "true",
    })
}
