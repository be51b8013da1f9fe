//! Health monitoring module.
//!
//! One [`TargetMonitor`] per target drives the sampling loop:
//!
//! ```text
//! ticker → Sampler → Classifier → HealthAggregator → OutageStateMachine → Notifier
//! ```
//!
//! Entering an outage delivers an alert once. Recovery is only logged; the
//! notifier is not called on the way back to healthy.

mod aggregator;
mod config;
mod error;
mod state;


pub use aggregator::*;
pub use config::*;
pub use error::*;
pub use state::*;

use crate::metrics::{
    AVAILABILITY_PERCENT, CONSECUTIVE_FAILURES, OUTAGES_TOTAL, OUTAGE_ACTIVE, SUCCESS_CHECKS,
};
use crate::notify::{Notifier, ALERT_CHANNEL};
use crate::probe::{ProbeResult, Sampler};
use crate::status::{StatusBoard, TargetStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What happened during a single tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub result: ProbeResult,
    pub snapshot: HealthSnapshot,
    pub transition: Option<Transition>,
}

/// Owns the sampling loop and all mutable health state for one target.
pub struct TargetMonitor {
    config: TargetConfig,
    sampler: Sampler,
    aggregator: HealthAggregator,
    state: OutageStateMachine,
    notifier: Arc<dyn Notifier>,
    /// Optional shared status board for the exposure endpoint
    status: Option<Arc<StatusBoard>>,
}

impl TargetMonitor {
    /// Create a monitor with its own HTTP client.
    pub fn new(config: TargetConfig, notifier: Arc<dyn Notifier>) -> Result<Self, MonitorError> {
        let sampler = Sampler::new(
            config.url.clone(),
            config.timeout(),
            config.status_policy.clone(),
        )
        .map_err(|source| MonitorError::Client {
            url: config.url.clone(),
            source,
        })?;
        Self::with_sampler(config, sampler, notifier)
    }

    /// Create a monitor around an existing sampler (for testing).
    pub fn with_sampler(
        config: TargetConfig,
        sampler: Sampler,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, MonitorError> {
        if config.interval_seconds == 0 {
            return Err(MonitorError::InvalidTarget {
                url: config.url.clone(),
                message: "interval must be greater than zero".to_string(),
            });
        }

        let aggregator = HealthAggregator::new(config.policy.clone(), config.history_limit);
        Ok(Self {
            config,
            sampler,
            aggregator,
            state: OutageStateMachine::new(),
            notifier,
            status: None,
        })
    }

    /// Publish per-tick status to a shared board.
    pub fn with_status_board(mut self, board: Arc<StatusBoard>) -> Self {
        board.update(TargetStatus::new(
            self.config.url.clone(),
            self.config.policy.name(),
        ));
        self.status = Some(board);
        self
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn state(&self) -> OutageState {
        self.state.state()
    }

    pub fn aggregator(&self) -> &HealthAggregator {
        &self.aggregator
    }

    /// Run one sample through the pipeline.
    pub async fn tick(&mut self) -> TickReport {
        let url = self.config.url.clone();
        let result = self.sampler.sample(&url).await;

        if result.is_success() {
            metrics::counter!(SUCCESS_CHECKS, "target" => url.clone()).increment(1);
        }

        let snapshot = self.aggregator.record(result.clone());
        metrics::gauge!(AVAILABILITY_PERCENT, "target" => url.clone()).set(snapshot.availability);
        metrics::gauge!(CONSECUTIVE_FAILURES, "target" => url.clone())
            .set(snapshot.consecutive_failures as f64);

        let latency_secs = result.duration_ms() as f64 / 1000.0;
        match self.config.policy {
            HealthPolicy::Windowed { window_seconds, .. } => tracing::info!(
                target_url = %url,
                status = ?result.status_code(),
                outcome = ?result.outcome_kind(),
                error_kind = %result.error_kind(),
                samples = snapshot.window_samples,
                "{}s availability: {:.2}%, took {:.2} seconds",
                window_seconds,
                snapshot.availability,
                latency_secs
            ),
            HealthPolicy::ConsecutiveFailures { .. } => tracing::info!(
                target_url = %url,
                status = ?result.status_code(),
                outcome = ?result.outcome_kind(),
                error_kind = %result.error_kind(),
                availability = snapshot.availability,
                "Consecutive failures: {}, took {:.2} seconds",
                snapshot.consecutive_failures,
                latency_secs
            ),
        }

        let transition = self.state.observe(snapshot.signal);
        match transition {
            Some(Transition::Opened) => {
                let reason = self.aggregator.breach_reason(&snapshot);
                metrics::gauge!(OUTAGE_ACTIVE, "target" => url.clone()).set(1.0);
                metrics::counter!(OUTAGES_TOTAL, "target" => url.clone()).increment(1);
                self.notify_outage(&url, &reason).await;
            }
            Some(Transition::Recovered { duration }) => {
                metrics::gauge!(OUTAGE_ACTIVE, "target" => url.clone()).set(0.0);
                tracing::info!(
                    target_url = %url,
                    outage_seconds = duration.as_secs(),
                    "Service recovered for {} (availability {:.2}%)",
                    url,
                    snapshot.availability
                );
            }
            None => {}
        }

        self.publish_status(&result, &snapshot);

        TickReport {
            result,
            snapshot,
            transition,
        }
    }

    /// Alert once on entering an outage. Delivery errors never stop the loop.
    async fn notify_outage(&self, url: &str, reason: &str) {
        tracing::warn!(target_url = %url, "OUTAGE ALERT: {} - {}", url, reason);

        let message = format!("{} is down: {}", url, reason);
        if let Err(e) = self.notifier.deliver(ALERT_CHANNEL, &message).await {
            tracing::warn!(
                target_url = %url,
                notifier = self.notifier.name(),
                error = %e,
                "Failed to deliver outage alert"
            );
        }
    }

    fn publish_status(&self, result: &ProbeResult, snapshot: &HealthSnapshot) {
        let Some(board) = &self.status else {
            return;
        };

        board.update(TargetStatus {
            url: self.config.url.clone(),
            policy: self.config.policy.name().to_string(),
            state: self.state.state(),
            availability: snapshot.availability,
            consecutive_failures: snapshot.consecutive_failures,
            total_checks: snapshot.total_checks,
            total_successes: snapshot.total_successes,
            last_status_code: result.status_code(),
            last_error_kind: result.error_kind(),
            last_latency_ms: result.duration_ms(),
            last_check_time: Some(result.checked_at()),
            outage_since: self.state.outage_since(),
        });
    }

    /// Start the sampling loop as a background task.
    ///
    /// A slow sample delays the next tick; ticks never overlap or queue up.
    pub fn start(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = self.config.interval().max(Duration::from_millis(1));
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(
                target_url = %self.config.url,
                interval_seconds = self.config.interval_seconds,
                policy = self.config.policy.name(),
                "Target monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!(target_url = %self.config.url, "Target monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.tick().await;
                    }
                }
            }
        })
    }
}
