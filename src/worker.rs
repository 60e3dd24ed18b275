// Background poll worker: fetch -> merge -> aggregate -> scale -> publish.
// Fetch failures keep last-known-good state; the loop never dies on them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};

use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::{Duration, Instant, interval};

use crate::history::HistoryStore;
use crate::history::aggregation;
use crate::models::StatusSnapshot;
use crate::monitor_repo::MonitorRepo;
use crate::scale;

/// Rate limit for the "no receivers" debug line (avoid logging every poll when no one is on /ws/status)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Repo, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub monitor_repo: Arc<MonitorRepo>,
    pub status_tx: broadcast::Sender<StatusSnapshot>,
    pub latest_tx: watch::Sender<Option<StatusSnapshot>>,
    pub ws_status_connections: Arc<AtomicUsize>,
    pub cycles_published_total: Arc<AtomicU64>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Worker timing and display-window config.
/// Stats logging and pruning use real-time intervals, independent of poll_interval_secs.
pub struct WorkerConfig {
    pub poll_interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
    /// How often to evict samples past the retention window (real seconds).
    pub prune_interval_secs: u64,
    /// Number of buckets the published window holds (the graph's width).
    pub graph_width: usize,
}

pub fn spawn(
    deps: WorkerDeps,
    config: WorkerConfig,
    mut store: HistoryStore,
) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        monitor_repo,
        status_tx,
        latest_tx,
        ws_status_connections,
        cycles_published_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        poll_interval_secs,
        stats_log_interval_secs,
        prune_interval_secs,
        graph_width,
    } = config;

    tokio::spawn(async move {
        let mut poll_tick = interval(Duration::from_secs(poll_interval_secs));
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prune_tick = interval(Duration::from_secs(prune_interval_secs));
        prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut samples_pruned_total: u64 = 0;
        let mut last_no_receivers_warn: Option<Instant> = None;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", poll_interval_secs);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = poll_tick.tick() => {
                    let samples = match monitor_repo.fetch_samples_with_retry().await {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "fetch_samples",
                                "fetch failed; keeping last known state"
                            );
                            continue;
                        }
                    };
                    store.merge(samples);

                    let Some(rollup) = aggregation::aggregate_hourly(&store.samples()) else {
                        tracing::debug!(
                            operation = "aggregate_hourly",
                            "no samples yet; skipping publish"
                        );
                        continue;
                    };
                    let window = scale::display_window(&rollup.buckets, graph_width);
                    let scale_factor = scale::scale_factor(window);
                    let latency_ms = window.last().map(|b| b.avg_latency_ms).unwrap_or(0.0);

                    let snapshot = StatusSnapshot {
                        online: rollup.online,
                        latency_ms,
                        scale_factor,
                        buckets: window.to_vec(),
                    };

                    latest_tx.send_replace(Some(snapshot.clone()));
                    if status_tx.send(snapshot).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_status",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }
                    cycles_published_total.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_status_clients =
                            ws_status_connections.load(std::sync::atomic::Ordering::Relaxed),
                        samples_stored = store.len(),
                        cycles_published_total = cycles_published_total.load(std::sync::atomic::Ordering::Relaxed),
                        samples_pruned_total = samples_pruned_total,
                        "app stats"
                    );
                }
                _ = prune_tick.tick() => {
                    let evicted = store.prune_old_data(chrono::Utc::now());
                    if evicted > 0 {
                        tracing::debug!(operation = "prune_old_data", evicted, "old samples pruned");
                        samples_pruned_total += evicted as u64;
                    }
                }
            }
        }
    })
}
