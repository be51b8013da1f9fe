//! Probing module: one bounded HTTP GET per tick.
//!
//! The [`Sampler`] issues the request and measures latency, the
//! [`Classifier`] turns the raw outcome into a success/failure verdict, and
//! the pair produce an immutable [`ProbeResult`].

mod classify;
mod error;
mod result;

pub use classify::*;
pub use error::*;
pub use result::*;

use crate::metrics::{RESPONSE_TIME_SECONDS, TOTAL_CHECKS};
use std::time::{Duration, Instant};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues single-attempt HTTP probes against one target.
pub struct Sampler {
    /// HTTP client with the request timeout applied
    client: reqwest::Client,
    /// Outcome classifier for this target
    classifier: Classifier,
    /// Label used on every metric this sampler emits
    target: String,
    timeout: Duration,
}

impl Sampler {
    /// Create a sampler with its own HTTP client.
    pub fn new(
        target: impl Into<String>,
        timeout: Duration,
        policy: StatusPolicy,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("page-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        Ok(Self::with_client(target, timeout, policy, client))
    }

    /// Create a sampler with a caller-supplied client (for testing).
    pub fn with_client(
        target: impl Into<String>,
        timeout: Duration,
        policy: StatusPolicy,
        client: reqwest::Client,
    ) -> Self {
        let target = target.into();
        Self {
            client,
            classifier: Classifier::new(target.clone(), policy),
            target,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Probe `url` once. Never retries; transport errors become failed results.
    pub async fn sample(&self, url: &str) -> ProbeResult {
        metrics::counter!(TOTAL_CHECKS, "target" => self.target.clone()).increment(1);

        let start = Instant::now();
        let response = self.client.get(url).timeout(self.timeout).send().await;
        let elapsed = start.elapsed();

        metrics::histogram!(RESPONSE_TIME_SECONDS, "target" => self.target.clone())
            .record(elapsed.as_secs_f64());

        let duration_ms = elapsed.as_millis() as u64;
        let at = Instant::now();

        match response {
            Ok(response) => {
                let code = response.status().as_u16();
                let verdict = self.classifier.classify(&RawOutcome::Status(code));
                if !verdict.success {
                    tracing::warn!(target_url = %url, status = code, "Check failed: non-success status");
                }
                ProbeResult::from_status(at, code, duration_ms, verdict.success)
            }
            Err(e) => {
                let error = ProbeError::from_reqwest(e, self.timeout.as_millis() as u64);
                let failure = error.transport_failure();
                let verdict = self.classifier.classify(&RawOutcome::Transport(failure));
                tracing::warn!(
                    target_url = %url,
                    error = %error,
                    error_kind = %verdict.error_kind,
                    "Check failed"
                );
                ProbeResult::from_transport_error(at, failure, duration_ms)
            }
        }
    }
}
