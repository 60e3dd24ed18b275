// Config loading and validation tests

use mando::config::{AppConfig, ServiceOverrides};

const VALID_CONFIG: &str = r#"
[server]
port = 8090
host = "0.0.0.0"

[service]
name = "efs"
service = "storage-api"
endpoint = "http://127.0.0.1:9000/state"

[monitoring]
poll_interval_secs = 5
stats_log_interval_secs = 60

[display]
graph_width = 58
graph_max_height = 36
broadcast_capacity = 16
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8090);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.service.name, "efs");
    assert_eq!(config.service.service, "storage-api");
    assert_eq!(config.service.endpoint, "http://127.0.0.1:9000/state");
    assert_eq!(config.monitoring.poll_interval_secs, 5);
    assert_eq!(config.display.graph_width, 58);
}

#[test]
fn test_config_monitoring_defaults_when_omitted() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert_eq!(config.monitoring.fetch_timeout_secs, 10);
    assert_eq!(config.monitoring.fetch_retries, 2);
    assert_eq!(config.monitoring.prune_interval_secs, 3600);
    assert_eq!(config.monitoring.retention_hours, 72);
    assert!(config.service.action_top.is_none());
    assert!(config.service.action_bottom.is_none());
}

#[test]
fn test_config_display_section_optional() {
    let without_display = VALID_CONFIG.split("[display]").next().unwrap();
    let config = AppConfig::load_from_str(without_display).expect("valid");
    assert_eq!(config.display.graph_width, 58);
    assert_eq!(config.display.graph_max_height, 36);
    assert_eq!(config.display.broadcast_capacity, 16);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8090", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_name() {
    let bad = VALID_CONFIG.replace("name = \"efs\"", "name = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("service.name"));
}

#[test]
fn test_config_validation_rejects_empty_endpoint() {
    let bad = VALID_CONFIG.replace(
        "endpoint = \"http://127.0.0.1:9000/state\"",
        "endpoint = \"\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("service.endpoint"));
}

#[test]
fn test_config_validation_rejects_poll_interval_zero() {
    let bad = VALID_CONFIG.replace("poll_interval_secs = 5", "poll_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("poll_interval_secs"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_graph_width_zero() {
    let bad = VALID_CONFIG.replace("graph_width = 58", "graph_width = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("graph_width"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 16", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8090);
    assert_eq!(config.service.name, "efs");
}

#[test]
fn test_cli_overrides_take_precedence() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    let overrides = ServiceOverrides {
        name: Some("db".into()),
        endpoint: Some("http://127.0.0.1:9001/state".into()),
        action_top: Some("xmessage action 1".into()),
        ..Default::default()
    };
    let config = AppConfig::load_with_overrides(path.to_str(), &overrides).expect("load");
    assert_eq!(config.service.name, "db");
    assert_eq!(config.service.service, "storage-api");
    assert_eq!(config.service.endpoint, "http://127.0.0.1:9001/state");
    assert_eq!(config.service.action_top.as_deref(), Some("xmessage action 1"));
}

#[test]
fn test_cli_override_validated_like_file_value() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    let overrides = ServiceOverrides {
        endpoint: Some(String::new()),
        ..Default::default()
    };
    let err = AppConfig::load_with_overrides(path.to_str(), &overrides).unwrap_err();
    assert!(err.to_string().contains("service.endpoint"));
}
