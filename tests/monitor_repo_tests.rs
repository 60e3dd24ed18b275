// MonitorRepo tests against stub endpoints bound to ephemeral ports

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use mando::monitor_repo::{FetchError, MonitorRepo};

const PAYLOAD: &str = r#"{
  "data": [
    {"timestamp": "2024-01-01T10:05:00", "latency_ms": 100, "online": "true"},
    {"timestamp": "2024-01-01T10:45:00", "latency_ms": 200, "online": "false"}
  ]
}"#;

/// Serves `app` on an ephemeral port; returns the base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn fetch_decodes_samples() {
    let app = Router::new().route("/state", get(|| async { PAYLOAD }));
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 0).unwrap();
    let samples = repo.fetch_samples().await.unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].latency_ms, 100.0);
    assert!(samples[0].online);
    assert!(!samples[1].online);
}

#[tokio::test]
async fn fetch_non_success_status_is_error() {
    let app = Router::new().route(
        "/state",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 0).unwrap();
    match repo.fetch_samples().await {
        Err(FetchError::Status(status)) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_malformed_json_is_error() {
    let app = Router::new().route("/state", get(|| async { "not json at all" }));
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 0).unwrap();
    assert!(matches!(
        repo.fetch_samples().await,
        Err(FetchError::Malformed(_))
    ));
}

#[tokio::test]
async fn fetch_missing_data_field_is_error() {
    let app = Router::new().route("/state", get(|| async { r#"{"items": []}"# }));
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 0).unwrap();
    assert!(matches!(
        repo.fetch_samples().await,
        Err(FetchError::Malformed(_))
    ));
}

#[tokio::test]
async fn fetch_connection_failure_is_http_error() {
    // Nothing listens on port 1.
    let repo = MonitorRepo::new("http://127.0.0.1:1/state", 1, 0).unwrap();
    assert!(matches!(
        repo.fetch_samples_with_retry().await,
        Err(FetchError::Http(_))
    ));
}

#[tokio::test]
async fn retry_recovers_from_transient_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_handler = calls.clone();
    let app = Router::new().route(
        "/state",
        get(move || {
            let calls = calls_handler.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
                } else {
                    PAYLOAD.into_response()
                }
            }
        }),
    );
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 2).unwrap();
    let samples = repo.fetch_samples_with_retry().await.unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_handler = calls.clone();
    let app = Router::new().route(
        "/state",
        get(move || {
            let calls = calls_handler.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                "not json"
            }
        }),
    );
    let base = serve(app).await;

    let repo = MonitorRepo::new(&format!("{base}/state"), 5, 3).unwrap();
    assert!(matches!(
        repo.fetch_samples_with_retry().await,
        Err(FetchError::Malformed(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
