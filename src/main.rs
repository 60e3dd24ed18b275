use anyhow::Result;
use clap::Parser;
use mando::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tokio::sync::{broadcast, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

/// Service response-time monitor: polls a monitor endpoint, aggregates
/// hourly latency history, serves status to display clients.
#[derive(Debug, Parser)]
#[command(name = "mando", version)]
struct Cli {
    /// Alternate config file
    #[arg(short = 'c', long)]
    config: Option<String>,
    /// Name shown in the status line
    #[arg(short = 'n', long)]
    name: Option<String>,
    /// Service label
    #[arg(short = 's', long)]
    service: Option<String>,
    /// API endpoint for data
    #[arg(short = 'e', long)]
    endpoint: Option<String>,
    /// Shell command for the top click region
    #[arg(long)]
    action_top: Option<String>,
    /// Shell command for the bottom click region
    #[arg(long)]
    action_bottom: Option<String>,
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let overrides = config::ServiceOverrides {
        name: cli.name,
        service: cli.service,
        endpoint: cli.endpoint,
        action_top: cli.action_top,
        action_bottom: cli.action_bottom,
    };
    let app_config = config::AppConfig::load_with_overrides(cli.config.as_deref(), &overrides)?;

    let (status_tx, _) =
        broadcast::channel::<models::StatusSnapshot>(app_config.display.broadcast_capacity);
    let (latest_tx, latest_rx) = watch::channel::<Option<models::StatusSnapshot>>(None);

    let monitor_repo = Arc::new(monitor_repo::MonitorRepo::new(
        &app_config.service.endpoint,
        app_config.monitoring.fetch_timeout_secs,
        app_config.monitoring.fetch_retries,
    )?);
    let service_info = Arc::new(models::ServiceInfo {
        name: app_config.service.name.clone(),
        service: app_config.service.service.clone(),
        endpoint: app_config.service.endpoint.clone(),
        action_top: app_config.service.action_top.clone(),
        action_bottom: app_config.service.action_bottom.clone(),
    });
    let store = history::HistoryStore::new(app_config.monitoring.retention_hours);

    let ws_status_connections = Arc::new(AtomicUsize::new(0));
    let cycles_published_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            monitor_repo,
            status_tx: status_tx.clone(),
            latest_tx,
            ws_status_connections: ws_status_connections.clone(),
            cycles_published_total,
            shutdown_rx,
        },
        worker::WorkerConfig {
            poll_interval_secs: app_config.monitoring.poll_interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            prune_interval_secs: app_config.monitoring.prune_interval_secs,
            graph_width: app_config.display.graph_width,
        },
        store,
    );

    let app = routes::app(status_tx, latest_rx, service_info, ws_status_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = worker_handle.await;
            }
        }
    }

    Ok(())
}
