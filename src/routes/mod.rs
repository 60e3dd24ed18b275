// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::models::{ServiceInfo, StatusSnapshot};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) status_tx: broadcast::Sender<StatusSnapshot>,
    pub(crate) latest_rx: watch::Receiver<Option<StatusSnapshot>>,
    pub(crate) service_info: Arc<ServiceInfo>,
    pub(crate) ws_status_connections: Arc<AtomicUsize>,
}

pub fn app(
    status_tx: broadcast::Sender<StatusSnapshot>,
    latest_rx: watch::Receiver<Option<StatusSnapshot>>,
    service_info: Arc<ServiceInfo>,
    ws_status_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        status_tx,
        latest_rx,
        service_info,
        ws_status_connections,
    };
    Router::new()
        .route("/", get(|| async { "mando: service response-time monitor" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/service", get(http::api_service_handler)) // GET /api/service
        .route("/api/status", get(http::api_status_handler)) // GET /api/status
        .route("/ws/status", get(ws::ws_status)) // WS /ws/status
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
