//! Status board module.
//!
//! Thread-safe, in-memory view of every monitored target. Monitors write
//! their latest state after each tick; the exposure endpoint reads it.

use crate::health::OutageState;
use crate::probe::ErrorKind;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Latest known state of one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub url: String,
    /// Health policy name (`windowed` or `consecutive_failures`)
    pub policy: String,
    pub state: OutageState,
    pub availability: f64,
    pub consecutive_failures: u32,
    pub total_checks: u64,
    pub total_successes: u64,
    pub last_status_code: Option<u16>,
    pub last_error_kind: ErrorKind,
    pub last_latency_ms: u64,
    pub last_check_time: Option<DateTime<Utc>>,
    pub outage_since: Option<DateTime<Utc>>,
}

impl TargetStatus {
    /// Status for a target that has not been checked yet.
    pub fn new(url: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            policy: policy.into(),
            state: OutageState::Healthy,
            availability: 100.0,
            consecutive_failures: 0,
            total_checks: 0,
            total_successes: 0,
            last_status_code: None,
            last_error_kind: ErrorKind::None,
            last_latency_ms: 0,
            last_check_time: None,
            outage_since: None,
        }
    }
}

/// Per-target status keyed by URL.
///
/// # Examples
///
/// ```
/// use page_monitor::status::{StatusBoard, TargetStatus};
///
/// let board = StatusBoard::new();
/// board.update(TargetStatus::new("http://localhost:8080", "windowed"));
/// assert_eq!(board.len(), 1);
/// assert_eq!(board.outage_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct StatusBoard {
    targets: DashMap<String, TargetStatus>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            targets: DashMap::new(),
        }
    }

    /// Insert or replace the status for `status.url`.
    pub fn update(&self, status: TargetStatus) {
        self.targets.insert(status.url.clone(), status);
    }

    pub fn get(&self, url: &str) -> Option<TargetStatus> {
        self.targets.get(url).map(|entry| entry.value().clone())
    }

    /// Snapshot of every target, sorted by URL.
    pub fn all(&self) -> Vec<TargetStatus> {
        let mut all: Vec<_> = self
            .targets
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.url.cmp(&b.url));
        all
    }

    pub fn outage_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|entry| entry.value().state == OutageState::Outage)
            .count()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
