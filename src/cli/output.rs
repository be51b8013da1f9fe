//! Output formatting helpers for CLI commands

use crate::health::OutageState;
use crate::metrics::StatusResponse;
use crate::status::TargetStatus;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

/// Result of a one-shot `check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub url: String,
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

/// `{url} is UP`, `{url} returned status {code}` or `{url} is DOWN: {error}`.
pub fn format_check_line(report: &CheckReport) -> String {
    match (report.up, report.status_code, &report.error) {
        (true, _, _) => format!("{} is {}", report.url, "UP".green()),
        (false, _, Some(error)) => format!("{} is {}: {}", report.url, "DOWN".red(), error),
        (false, Some(code), None) => {
            format!("{} returned status {}", report.url, code.to_string().yellow())
        }
        (false, None, None) => format!("{} is {}", report.url, "DOWN".red()),
    }
}

pub fn format_check_json(report: &CheckReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn state_cell(state: OutageState) -> String {
    match state {
        OutageState::Healthy => "Healthy".green().to_string(),
        OutageState::Outage => "Outage".red().to_string(),
    }
}

fn last_result(target: &TargetStatus) -> String {
    match (target.last_check_time, target.last_status_code) {
        (None, _) => "-".to_string(),
        (Some(_), Some(code)) => code.to_string(),
        (Some(_), None) => target.last_error_kind.to_string(),
    }
}

/// Format per-target status as a table
pub fn format_status_table(response: &StatusResponse) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Target",
        "Policy",
        "State",
        "Availability",
        "Failures",
        "Checks",
        "Last",
        "Latency",
    ]);

    for t in &response.targets {
        table.add_row(vec![
            Cell::new(&t.url),
            Cell::new(&t.policy),
            Cell::new(state_cell(t.state)),
            Cell::new(format!("{:.2}%", t.availability)),
            Cell::new(t.consecutive_failures),
            Cell::new(format!("{}/{}", t.total_successes, t.total_checks)),
            Cell::new(last_result(t)),
            Cell::new(format!("{}ms", t.last_latency_ms)),
        ]);
    }

    format!(
        "{}\n{} target(s), {} in outage, up {}s",
        table, response.targets.len(), response.outages, response.uptime_seconds
    )
}

pub fn format_status_json(response: &StatusResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ErrorKind;

    fn report(up: bool, status_code: Option<u16>, error: Option<&str>) -> CheckReport {
        CheckReport {
            url: "http://a.test".to_string(),
            up,
            status_code,
            error: error.map(str::to_string),
            latency_ms: 12,
        }
    }

    #[test]
    fn test_check_line_up() {
        colored::control::set_override(false);
        assert_eq!(format_check_line(&report(true, Some(200), None)), "http://a.test is UP");
    }

    #[test]
    fn test_check_line_bad_status() {
        colored::control::set_override(false);
        assert_eq!(
            format_check_line(&report(false, Some(503), None)),
            "http://a.test returned status 503"
        );
    }

    #[test]
    fn test_check_line_transport_error() {
        colored::control::set_override(false);
        assert_eq!(
            format_check_line(&report(false, None, Some("request timeout after 5000ms"))),
            "http://a.test is DOWN: request timeout after 5000ms"
        );
    }

    #[test]
    fn test_check_json_omits_missing_fields() {
        let json = format_check_json(&report(false, None, Some("connection failed"))).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["up"], false);
        assert!(parsed.get("status_code").is_none());
    }

    #[test]
    fn test_status_table_lists_targets() {
        let mut down = TargetStatus::new("http://down.test", "consecutive_failures");
        down.state = OutageState::Outage;
        down.last_check_time = Some(chrono::Utc::now());
        down.last_error_kind = ErrorKind::Timeout;

        let response = StatusResponse {
            uptime_seconds: 30,
            outages: 1,
            targets: vec![down, TargetStatus::new("http://up.test", "windowed")],
        };

        let output = format_status_table(&response);
        assert!(output.contains("Target"));
        assert!(output.contains("http://down.test"));
        assert!(output.contains("timeout"));
        assert!(output.contains("Outage"));
        assert!(output.contains("2 target(s), 1 in outage"));
    }

    #[test]
    fn test_status_table_empty() {
        let response = StatusResponse {
            uptime_seconds: 0,
            outages: 0,
            targets: vec![],
        };
        assert!(format_status_table(&response).contains("0 target(s)"));
    }
}
