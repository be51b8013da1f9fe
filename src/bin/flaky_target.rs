//! Local target for trying page-monitor by hand.
//!
//! Answers every request with a small status page after 200ms, except during
//! second 10 of each minute when responses take a full second. With
//! `--fail-every N` every Nth request gets a 500 instead.

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use chrono::Timelike;
use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>flaky-target</title></head>
  <body><h1>All systems operational</h1></body>
</html>
"#;

#[derive(Parser, Debug)]
#[command(name = "flaky-target", version, about = "Slow, occasionally failing HTTP target")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Second of each minute during which responses are slow
    #[arg(long, default_value = "10")]
    slow_second: u32,

    /// Return 500 on every Nth request (0 disables)
    #[arg(long, default_value = "0")]
    fail_every: u64,
}

struct FlakyState {
    slow_second: u32,
    fail_every: u64,
    requests: AtomicU64,
}

async fn status_page(State(state): State<Arc<FlakyState>>) -> (StatusCode, Html<&'static str>) {
    let n = state.requests.fetch_add(1, Ordering::Relaxed) + 1;
    if state.fail_every > 0 && n % state.fail_every == 0 {
        tracing::info!(request = n, "Returning 500");
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(STATUS_PAGE));
    }

    let delay = if chrono::Utc::now().second() == state.slow_second {
        Duration::from_secs(1)
    } else {
        Duration::from_millis(200)
    };
    tokio::time::sleep(delay).await;

    (StatusCode::OK, Html(STATUS_PAGE))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(FlakyState {
        slow_second: args.slow_second,
        fail_every: args.fail_every,
        requests: AtomicU64::new(0),
    });

    let app = Router::new()
        .route("/", get(status_page))
        .fallback(status_page)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("Server running on http://localhost:{}", args.port);
    axum::serve(listener, app).await?;
    Ok(())
}
