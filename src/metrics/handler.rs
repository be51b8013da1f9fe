//! # Metrics HTTP Handlers
//!
//! Axum handlers and server for the exposure endpoint. The server runs as its
//! own task and only reads shared state, so scrapes never wait on a probe.

use super::{LivenessResponse, MetricsState, StatusResponse};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Build the exposure router.
pub fn router(state: Arc<MetricsState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/v1/status", get(status_handler))
        .route("/health", get(liveness_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /metrics endpoint (Prometheus text format).
///
/// Always returns 200, even before the first check has been recorded.
pub async fn metrics_handler(State(state): State<Arc<MetricsState>>) -> impl IntoResponse {
    let metrics = state.render_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics,
    )
}

/// Handler for GET /v1/status endpoint (JSON format).
pub async fn status_handler(State(state): State<Arc<MetricsState>>) -> Json<StatusResponse> {
    let targets = state.status().all();
    Json(StatusResponse {
        uptime_seconds: state.uptime_seconds(),
        outages: state.status().outage_count(),
        targets,
    })
}

/// GET /health - process liveness.
pub async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serve the exposure endpoint on `listener` until `cancel_token` fires.
pub fn start(
    listener: TcpListener,
    state: Arc<MetricsState>,
    cancel_token: CancellationToken,
) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(addr = %addr, "Metrics available at /metrics");
        }
        axum::serve(listener, router(state))
            .with_graceful_shutdown(async move { cancel_token.cancelled().await })
            .await
    })
}
