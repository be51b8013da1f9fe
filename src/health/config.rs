//! Per-target monitoring configuration.

use crate::probe::StatusPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_window_seconds() -> u64 {
    120
}

fn default_availability_threshold() -> f64 {
    95.0
}

fn default_failure_threshold() -> u32 {
    3
}

/// How the rolling health signal is computed and when an outage opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthPolicy {
    /// Success ratio over a trailing time window
    Windowed {
        #[serde(default = "default_window_seconds")]
        window_seconds: u64,
        /// Percentage below which the target is in outage
        #[serde(default = "default_availability_threshold")]
        availability_threshold: f64,
    },
    /// Run length of consecutive failed checks
    ConsecutiveFailures {
        #[serde(default = "default_failure_threshold")]
        failure_threshold: u32,
    },
}

impl Default for HealthPolicy {
    fn default() -> Self {
        HealthPolicy::Windowed {
            window_seconds: default_window_seconds(),
            availability_threshold: default_availability_threshold(),
        }
    }
}

impl HealthPolicy {
    /// Short policy name used in logs and status output.
    pub fn name(&self) -> &'static str {
        match self {
            HealthPolicy::Windowed { .. } => "windowed",
            HealthPolicy::ConsecutiveFailures { .. } => "consecutive_failures",
        }
    }
}

/// Configuration for one monitored target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// URL probed with a GET on every tick
    pub url: String,
    /// Seconds between ticks
    pub interval_seconds: u64,
    /// Timeout for each probe request
    pub timeout_seconds: u64,
    /// Results kept for status reporting under the consecutive-failure policy
    pub history_limit: usize,
    /// Which status codes count as success
    pub status_policy: StatusPolicy,
    /// Health aggregation and outage policy
    pub policy: HealthPolicy,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            interval_seconds: 10,
            timeout_seconds: 5,
            history_limit: 100,
            status_policy: StatusPolicy::default(),
            policy: HealthPolicy::default(),
        }
    }
}

impl TargetConfig {
    /// Default settings for a single URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
