//! Outage state machine.

use super::aggregator::HealthSignal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Whether a target is currently considered down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutageState {
    #[default]
    Healthy,
    Outage,
}

/// Edge produced by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Healthy -> Outage
    Opened,
    /// Outage -> Healthy, with how long the outage lasted
    Recovered { duration: Duration },
}

/// Edge-triggered Healthy/Outage tracker for one target.
#[derive(Debug, Clone, Default)]
pub struct OutageStateMachine {
    state: OutageState,
    /// When the current outage opened
    outage_started: Option<Instant>,
    outage_started_at: Option<DateTime<Utc>>,
    /// Count of Healthy -> Outage edges
    outages_opened: u64,
}

impl OutageStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OutageState {
        self.state
    }

    pub fn outage_since(&self) -> Option<DateTime<Utc>> {
        self.outage_started_at
    }

    pub fn outages_opened(&self) -> u64 {
        self.outages_opened
    }

    /// Apply a health signal. Returns Some only when the state changes.
    pub fn observe(&mut self, signal: HealthSignal) -> Option<Transition> {
        self.observe_at(signal, Instant::now())
    }

    pub fn observe_at(&mut self, signal: HealthSignal, now: Instant) -> Option<Transition> {
        match (self.state, signal) {
            (OutageState::Healthy, HealthSignal::Breach) => {
                self.state = OutageState::Outage;
                self.outage_started = Some(now);
                self.outage_started_at = Some(Utc::now());
                self.outages_opened += 1;
                Some(Transition::Opened)
            }
            (OutageState::Outage, HealthSignal::Clear) => {
                self.state = OutageState::Healthy;
                self.outage_started_at = None;
                let duration = self
                    .outage_started
                    .take()
                    .map(|start| now.saturating_duration_since(start))
                    .unwrap_or_default();
                Some(Transition::Recovered { duration })
            }
            _ => None,
        }
    }
}
