// GET handlers: version, api/service, api/status

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/service — static service identity (monitored service, endpoint,
/// click-action commands for the display layer).
pub(super) async fn api_service_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.service_info.as_ref().clone())
}

/// GET /api/status — latest published snapshot; 503 until the first
/// successful poll cycle.
pub(super) async fn api_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let latest = state.latest_rx.borrow().clone();
    match latest {
        Some(snapshot) => axum::Json(snapshot).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(serde_json::json!({ "error": "no status yet" })),
        )
            .into_response(),
    }
}
