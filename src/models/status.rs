// What the display layer consumes: the published status tuple and the
// static service identity.

use serde::{Deserialize, Serialize};

use super::HourBucket;

/// One published result of a poll cycle. `latency_ms` is the most recent
/// bucket's average; `buckets` is the display window, one bar per hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub online: bool,
    pub latency_ms: f64,
    pub scale_factor: f64,
    pub buckets: Vec<HourBucket>,
}

/// Static service identity; built once from config and exposed via
/// GET /api/service and the WS welcome message. The click actions are
/// opaque shell commands for the display layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub service: String,
    pub endpoint: String,
    pub action_top: Option<String>,
    pub action_bottom: Option<String>,
}
