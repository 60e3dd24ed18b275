use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Short name shown in the status line.
    pub name: String,
    /// Label of the monitored service, shown under the graph.
    pub service: String,
    /// Monitor endpoint returning the sample history document.
    pub endpoint: String,
    /// Shell command the display layer runs for its top click region.
    #[serde(default)]
    pub action_top: Option<String>,
    /// Shell command the display layer runs for its bottom click region.
    #[serde(default)]
    pub action_bottom: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub poll_interval_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Extra fetch attempts per cycle before the cycle is abandoned.
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,
    /// How often to log app stats (ws_status clients, cycles published) at INFO level.
    pub stats_log_interval_secs: u64,
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
    /// Samples older than this are evicted from the in-memory history.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Graph width in bars; the published window holds this many buckets.
    #[serde(default = "default_graph_width")]
    pub graph_width: usize,
    /// Drawable bar height in pixels on the display side.
    #[serde(default = "default_graph_max_height")]
    pub graph_max_height: u32,
    /// Max number of snapshots kept in the broadcast channel for /ws/status (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            graph_width: default_graph_width(),
            graph_max_height: default_graph_max_height(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_fetch_retries() -> u32 {
    2
}

fn default_prune_interval_secs() -> u64 {
    3600
}

fn default_retention_hours() -> u32 {
    72
}

fn default_graph_width() -> usize {
    58
}

fn default_graph_max_height() -> u32 {
    36
}

fn default_broadcast_capacity() -> usize {
    16
}

/// Command-line overrides for the [service] section. Applied before
/// validation so an override is checked like a file value.
#[derive(Debug, Clone, Default)]
pub struct ServiceOverrides {
    pub name: Option<String>,
    pub service: Option<String>,
    pub endpoint: Option<String>,
    pub action_top: Option<String>,
    pub action_bottom: Option<String>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with_overrides(None, &ServiceOverrides::default())
    }

    /// Load from `path` (falling back to CONFIG_FILE, then "config.toml"),
    /// overlay CLI overrides, then validate.
    pub fn load_with_overrides(
        path: Option<&str>,
        overrides: &ServiceOverrides,
    ) -> anyhow::Result<Self> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("CONFIG_FILE").ok())
            .unwrap_or_else(|| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        let mut config: AppConfig = toml::from_str(&s)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &ServiceOverrides) {
        if let Some(name) = &overrides.name {
            self.service.name = name.clone();
        }
        if let Some(service) = &overrides.service {
            self.service.service = service.clone();
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.service.endpoint = endpoint.clone();
        }
        if let Some(action) = &overrides.action_top {
            self.service.action_top = Some(action.clone());
        }
        if let Some(action) = &overrides.action_bottom {
            self.service.action_bottom = Some(action.clone());
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.service.name.is_empty(),
            "service.name must be non-empty"
        );
        anyhow::ensure!(
            !self.service.service.is_empty(),
            "service.service must be non-empty"
        );
        anyhow::ensure!(
            !self.service.endpoint.is_empty(),
            "service.endpoint must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_secs > 0,
            "monitoring.poll_interval_secs must be > 0, got {}",
            self.monitoring.poll_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.fetch_timeout_secs > 0,
            "monitoring.fetch_timeout_secs must be > 0, got {}",
            self.monitoring.fetch_timeout_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.prune_interval_secs > 0,
            "monitoring.prune_interval_secs must be > 0, got {}",
            self.monitoring.prune_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.retention_hours > 0,
            "monitoring.retention_hours must be > 0, got {}",
            self.monitoring.retention_hours
        );
        anyhow::ensure!(
            self.display.graph_width > 0,
            "display.graph_width must be > 0, got {}",
            self.display.graph_width
        );
        anyhow::ensure!(
            self.display.graph_max_height > 0,
            "display.graph_max_height must be > 0, got {}",
            self.display.graph_max_height
        );
        anyhow::ensure!(
            self.display.broadcast_capacity > 0,
            "display.broadcast_capacity must be > 0, got {}",
            self.display.broadcast_capacity
        );
        Ok(())
    }
}
