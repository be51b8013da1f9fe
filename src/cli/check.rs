//! One-shot check command

use crate::cli::output::{format_check_json, format_check_line, CheckReport};
use crate::cli::CheckArgs;
use crate::probe::{ProbeError, StatusPolicy};
use std::time::{Duration, Instant};

/// Probe `url` once with a fresh client.
pub async fn run_check(url: &str, timeout: Duration) -> Result<CheckReport, ProbeError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("page-monitor/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProbeError::Request(e.to_string()))?;

    let start = Instant::now();
    let response = client.get(url).send().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let report = match response {
        Ok(response) => {
            let code = response.status().as_u16();
            CheckReport {
                url: url.to_string(),
                up: StatusPolicy::Strict.is_success_code(code),
                status_code: Some(code),
                error: None,
                latency_ms,
            }
        }
        Err(e) => {
            let error = ProbeError::from_reqwest(e, timeout.as_millis() as u64);
            CheckReport {
                url: url.to_string(),
                up: false,
                status_code: None,
                error: Some(error.to_string()),
                latency_ms,
            }
        }
    };
    Ok(report)
}

/// Handle `page-monitor check`. Returns whether the target is up.
pub async fn handle_check(args: &CheckArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let report = run_check(&args.url, Duration::from_secs(args.timeout)).await?;

    if args.json {
        println!("{}", format_check_json(&report)?);
    } else {
        println!("{}", format_check_line(&report));
    }

    Ok(report.up)
}
