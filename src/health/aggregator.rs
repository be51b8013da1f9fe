//! Rolling health computation over a target's probe results.

use super::config::HealthPolicy;
use crate::probe::ProbeResult;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Policy verdict fed to the outage state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthSignal {
    /// The outage condition holds
    Breach,
    /// The recovery condition holds
    Clear,
    /// Neither holds; keep the current state
    Hold,
}

/// Health values computed after recording a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSnapshot {
    /// Windowed ratio, or lifetime ratio under the consecutive-failure policy
    pub availability: f64,
    pub consecutive_failures: u32,
    pub total_checks: u64,
    pub total_successes: u64,
    /// Results currently counted by the windowed ratio (history length otherwise)
    pub window_samples: usize,
    pub signal: HealthSignal,
}

/// Owns a target's result history and derives its health signal.
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    policy: HealthPolicy,
    history: VecDeque<ProbeResult>,
    history_limit: usize,
    consecutive_failures: u32,
    total_checks: u64,
    total_successes: u64,
}

impl HealthAggregator {
    pub fn new(policy: HealthPolicy, history_limit: usize) -> Self {
        Self {
            policy,
            history: VecDeque::new(),
            history_limit: history_limit.max(1),
            consecutive_failures: 0,
            total_checks: 0,
            total_successes: 0,
        }
    }

    pub fn policy(&self) -> &HealthPolicy {
        &self.policy
    }

    pub fn history(&self) -> &VecDeque<ProbeResult> {
        &self.history
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn total_checks(&self) -> u64 {
        self.total_checks
    }

    pub fn total_successes(&self) -> u64 {
        self.total_successes
    }

    /// Append a result and recompute health as of the result's timestamp.
    pub fn record(&mut self, result: ProbeResult) -> HealthSnapshot {
        let now = result.at();

        self.total_checks += 1;
        if result.is_success() {
            self.total_successes += 1;
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        }

        self.history.push_back(result);
        self.evict(now);

        self.snapshot_at(now)
    }

    /// Health as of `now` without recording anything.
    pub fn snapshot_at(&self, now: Instant) -> HealthSnapshot {
        let (availability, window_samples) = match self.policy {
            HealthPolicy::Windowed { window_seconds, .. } => {
                window_ratio(&self.history, now, Duration::from_secs(window_seconds))
            }
            HealthPolicy::ConsecutiveFailures { .. } => (
                percentage(self.total_successes, self.total_checks),
                self.history.len(),
            ),
        };

        HealthSnapshot {
            availability,
            consecutive_failures: self.consecutive_failures,
            total_checks: self.total_checks,
            total_successes: self.total_successes,
            window_samples,
            signal: self.signal(availability),
        }
    }

    /// Windowed availability as of `now`. Under the consecutive-failure
    /// policy this is the lifetime ratio.
    pub fn availability_at(&self, now: Instant) -> f64 {
        self.snapshot_at(now).availability
    }

    /// Human-readable reason for an outage, used in alert messages.
    pub fn breach_reason(&self, snapshot: &HealthSnapshot) -> String {
        match self.policy {
            HealthPolicy::Windowed { .. } => {
                format!("availability dropped to {:.2}%", snapshot.availability)
            }
            HealthPolicy::ConsecutiveFailures { .. } => {
                format!("{} consecutive failures", snapshot.consecutive_failures)
            }
        }
    }

    fn signal(&self, availability: f64) -> HealthSignal {
        match self.policy {
            HealthPolicy::Windowed {
                availability_threshold,
                ..
            } => {
                if availability < availability_threshold {
                    HealthSignal::Breach
                } else {
                    HealthSignal::Clear
                }
            }
            HealthPolicy::ConsecutiveFailures { failure_threshold } => {
                if self.consecutive_failures >= failure_threshold {
                    HealthSignal::Breach
                } else if self.consecutive_failures == 0 {
                    HealthSignal::Clear
                } else {
                    HealthSignal::Hold
                }
            }
        }
    }

    fn evict(&mut self, now: Instant) {
        match self.policy {
            HealthPolicy::Windowed { window_seconds, .. } => {
                let window = Duration::from_secs(window_seconds);
                while self
                    .history
                    .front()
                    .is_some_and(|r| !in_window(r, now, window))
                {
                    self.history.pop_front();
                }
            }
            HealthPolicy::ConsecutiveFailures { .. } => {
                while self.history.len() > self.history_limit {
                    self.history.pop_front();
                }
            }
        }
    }
}

/// A result is in the window when `timestamp > now - window`.
fn in_window(result: &ProbeResult, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(result.at()) < window
}

fn window_ratio(history: &VecDeque<ProbeResult>, now: Instant, window: Duration) -> (f64, usize) {
    let (total, success) = history
        .iter()
        .filter(|r| in_window(r, now, window))
        .fold((0u64, 0u64), |(total, success), r| {
            (total + 1, success + u64::from(r.is_success()))
        });
    (percentage(success, total), total as usize)
}

/// No evidence of failure means healthy.
fn percentage(success: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    success as f64 * 100.0 / total as f64
}
