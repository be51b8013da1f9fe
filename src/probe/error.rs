//! Error types for probing.

use super::result::TransportFailure;
use thiserror::Error;

/// Transport errors raised while sampling a target.
///
/// These never escape the sampling loop; they are folded into a failed
/// `ProbeResult` and logged.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// Request timeout
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other request error (TLS, redirect loop, body)
    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout(timeout_ms)
        } else if e.is_connect() {
            ProbeError::ConnectionFailed(e.to_string())
        } else {
            ProbeError::Request(e.to_string())
        }
    }

    pub fn transport_failure(&self) -> TransportFailure {
        match self {
            ProbeError::Timeout(_) => TransportFailure::Timeout,
            ProbeError::ConnectionFailed(_) | ProbeError::Request(_) => TransportFailure::Network,
        }
    }
}
