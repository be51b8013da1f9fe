//! Error types for target monitoring.

use crate::probe::ProbeError;
use thiserror::Error;

/// Errors raised while constructing a monitor. The running loop never fails.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client for {url}: {source}")]
    Client {
        url: String,
        #[source]
        source: ProbeError,
    },

    /// Target settings are unusable
    #[error("invalid target {url}: {message}")]
    InvalidTarget { url: String, message: String },
}
