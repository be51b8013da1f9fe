//! Status command implementation

use crate::cli::output::{format_status_json, format_status_table};
use crate::cli::StatusArgs;
use crate::metrics::StatusResponse;
use std::time::Duration;

/// Fetch `/v1/status` from a running monitor.
pub async fn fetch_status(endpoint: &str) -> Result<StatusResponse, Box<dyn std::error::Error>> {
    let url = format!("{}/v1/status", endpoint.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = client.get(&url).send().await.map_err(|e| {
        format!("Could not reach monitor at {}: {}", endpoint, e)
    })?;

    if !response.status().is_success() {
        return Err(format!("{} returned {}", url, response.status()).into());
    }

    Ok(response.json::<StatusResponse>().await?)
}

/// Handle `page-monitor status` command
pub async fn handle_status(args: &StatusArgs) -> Result<String, Box<dyn std::error::Error>> {
    let response = fetch_status(&args.endpoint).await?;
    if args.json {
        Ok(format_status_json(&response)?)
    } else {
        Ok(format_status_table(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "uptime_seconds": 42,
        "outages": 1,
        "targets": [{
            "url": "http://a.test",
            "policy": "windowed",
            "state": "outage",
            "availability": 90.0,
            "consecutive_failures": 2,
            "total_checks": 20,
            "total_successes": 18,
            "last_status_code": 503,
            "last_error_kind": "none",
            "last_latency_ms": 15,
            "last_check_time": "2024-05-01T12:00:00Z",
            "outage_since": "2024-05-01T11:59:00Z"
        }]
    }"#;

    #[tokio::test]
    async fn test_status_renders_table() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let args = StatusArgs {
            endpoint: server.url(),
            json: false,
        };
        let output = handle_status(&args).await.unwrap();
        assert!(output.contains("http://a.test"));
        assert!(output.contains("90.00%"));
        assert!(output.contains("503"));
    }

    #[tokio::test]
    async fn test_status_json_round_trips() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/status")
            .with_status(200)
            .with_body(BODY)
            .create_async()
            .await;

        let args = StatusArgs {
            endpoint: format!("{}/", server.url()),
            json: true,
        };
        let output = handle_status(&args).await.unwrap();
        let parsed: StatusResponse = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.outages, 1);
        assert_eq!(parsed.targets[0].total_checks, 20);
    }

    #[tokio::test]
    async fn test_status_unreachable_monitor() {
        let args = StatusArgs {
            endpoint: "http://127.0.0.1:1".to_string(),
            json: false,
        };
        let err = handle_status(&args).await.unwrap_err();
        assert!(err.to_string().contains("Could not reach monitor"));
    }

    #[tokio::test]
    async fn test_status_non_success_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/status")
            .with_status(500)
            .create_async()
            .await;

        let args = StatusArgs {
            endpoint: server.url(),
            json: false,
        };
        assert!(handle_status(&args).await.is_err());
    }
}
