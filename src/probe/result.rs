//! Probe result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Error-kind tag attached to a probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The target answered with an HTTP status
    #[default]
    None,
    /// The request did not complete within the configured timeout
    Timeout,
    /// Any other transport failure (DNS, connection refused, TLS, reset)
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::None => write!(f, "none"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Network => write!(f, "network"),
        }
    }
}

/// Transport-level failure, before any HTTP status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Network,
}

impl From<TransportFailure> for ErrorKind {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout => ErrorKind::Timeout,
            TransportFailure::Network => ErrorKind::Network,
        }
    }
}

/// Raw outcome of a single request, prior to classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOutcome {
    /// The target responded with this status code
    Status(u16),
    /// The request failed before a status was received
    Transport(TransportFailure),
}

/// Coarse outcome taxonomy used for logging and error accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    TransportTimeout,
    TransportNetworkError,
    HttpFailureStatus,
    HttpSuccessStatus,
}

/// One sample taken against a target.
///
/// A result carries either a status code or a non-`None` error kind, never
/// both and never neither. Fields are private so only the two constructors
/// can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    at: Instant,
    checked_at: DateTime<Utc>,
    status_code: Option<u16>,
    duration_ms: u64,
    error_kind: ErrorKind,
    success: bool,
}

impl ProbeResult {
    /// Result for a request that produced an HTTP status.
    pub fn from_status(at: Instant, status_code: u16, duration_ms: u64, success: bool) -> Self {
        Self {
            at,
            checked_at: Utc::now(),
            status_code: Some(status_code),
            duration_ms,
            error_kind: ErrorKind::None,
            success,
        }
    }

    /// Result for a request that failed at the transport layer. Always a failure.
    pub fn from_transport_error(at: Instant, failure: TransportFailure, duration_ms: u64) -> Self {
        Self {
            at,
            checked_at: Utc::now(),
            status_code: None,
            duration_ms,
            error_kind: failure.into(),
            success: false,
        }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Map this result onto the outcome taxonomy.
    pub fn outcome_kind(&self) -> OutcomeKind {
        match (self.error_kind, self.success) {
            (ErrorKind::Timeout, _) => OutcomeKind::TransportTimeout,
            (ErrorKind::Network, _) => OutcomeKind::TransportNetworkError,
            (ErrorKind::None, true) => OutcomeKind::HttpSuccessStatus,
            (ErrorKind::None, false) => OutcomeKind::HttpFailureStatus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_result_has_no_error_kind() {
        let result = ProbeResult::from_status(Instant::now(), 200, 12, true);
        assert_eq!(result.status_code(), Some(200));
        assert_eq!(result.error_kind(), ErrorKind::None);
        assert!(result.is_success());
    }

    #[test]
    fn test_transport_result_has_no_status() {
        let result =
            ProbeResult::from_transport_error(Instant::now(), TransportFailure::Network, 3);
        assert!(result.status_code().is_none());
        assert_eq!(result.error_kind(), ErrorKind::Network);
        assert!(!result.is_success());
    }

    #[test]
    fn test_outcome_kind_mapping() {
        let now = Instant::now();
        assert_eq!(
            ProbeResult::from_transport_error(now, TransportFailure::Timeout, 5000).outcome_kind(),
            OutcomeKind::TransportTimeout
        );
        assert_eq!(
            ProbeResult::from_transport_error(now, TransportFailure::Network, 1).outcome_kind(),
            OutcomeKind::TransportNetworkError
        );
        assert_eq!(
            ProbeResult::from_status(now, 503, 20, false).outcome_kind(),
            OutcomeKind::HttpFailureStatus
        );
        assert_eq!(
            ProbeResult::from_status(now, 204, 20, true).outcome_kind(),
            OutcomeKind::HttpSuccessStatus
        );
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::None.to_string(), "none");
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
