//! Shared test utilities for page-monitor integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use page_monitor::health::{HealthPolicy, TargetConfig};
use page_monitor::notify::{Notifier, NotifyError};
use std::sync::Mutex;

// =============================================================================
// Notifiers
// =============================================================================

/// Records every delivered message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, channel: &str, message: &str) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel.to_string(), message.to_string()));
        Ok(())
    }
}

/// Always fails delivery.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _channel: &str, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection reset".to_string()))
    }
}

// =============================================================================
// Target Builders
// =============================================================================

/// Target that opens an outage after `threshold` failures in a row.
pub fn consecutive_target(url: &str, threshold: u32) -> TargetConfig {
    TargetConfig {
        url: url.to_string(),
        interval_seconds: 1,
        timeout_seconds: 2,
        policy: HealthPolicy::ConsecutiveFailures {
            failure_threshold: threshold,
        },
        ..TargetConfig::default()
    }
}

/// Target with a two-minute availability window.
pub fn windowed_target(url: &str, availability_threshold: f64) -> TargetConfig {
    TargetConfig {
        url: url.to_string(),
        interval_seconds: 1,
        timeout_seconds: 2,
        policy: HealthPolicy::Windowed {
            window_seconds: 120,
            availability_threshold,
        },
        ..TargetConfig::default()
    }
}
