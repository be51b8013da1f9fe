//! # Metrics Types
//!
//! Data structures for JSON status API responses.

use crate::status::TargetStatus;
use serde::{Deserialize, Serialize};

/// JSON response for GET /v1/status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Process uptime in seconds since startup
    pub uptime_seconds: u64,
    /// Number of targets currently in outage
    pub outages: usize,
    /// Per-target breakdown, sorted by URL
    pub targets: Vec<TargetStatus>,
}

/// JSON response for GET /health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::OutageState;
    use crate::probe::ErrorKind;

    #[test]
    fn test_status_response_serialization() {
        let response = StatusResponse {
            uptime_seconds: 3600,
            outages: 1,
            targets: vec![TargetStatus {
                url: "http://localhost:8080".to_string(),
                policy: "windowed".to_string(),
                state: OutageState::Outage,
                availability: 90.0,
                consecutive_failures: 2,
                total_checks: 20,
                total_successes: 18,
                last_status_code: None,
                last_error_kind: ErrorKind::Timeout,
                last_latency_ms: 5001,
                last_check_time: None,
                outage_since: None,
            }],
        };

        let json = serde_json::to_string(&response).expect("Failed to serialize");
        assert!(json.contains("uptime_seconds"));
        assert!(json.contains("3600"));
        assert!(json.contains("\"state\":\"outage\""));
        assert!(json.contains("\"last_error_kind\":\"timeout\""));

        let parsed: StatusResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.targets.len(), 1);
        assert_eq!(parsed.targets[0].state, OutageState::Outage);
    }
}
