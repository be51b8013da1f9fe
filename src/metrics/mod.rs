//! # Metrics Module
//!
//! Instrument names, Prometheus recorder setup, and the exposure endpoint.
//!
//! ## Overview
//!
//! Every instrument carries a `target` label holding the probed URL, so one
//! process can supervise several targets over a single registry. The
//! `metrics` facade recorder is internally synchronized; sampling loops write
//! to it concurrently while the exposure endpoint renders it.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `webpage_total_checks{target}` - Checks performed
//! - `webpage_success_checks{target}` - Checks that succeeded
//! - `webpage_outages_total{target}` - Outages opened
//!
//! **Histograms:**
//! - `webpage_response_time_seconds{target}` - Probe latency
//!
//! **Gauges:**
//! - `webpage_availability_percent{target}` - Current availability
//! - `webpage_last_status_code{target}` - Most recent HTTP status
//! - `webpage_consecutive_failures{target}` - Current failure run
//! - `webpage_outage_active{target}` - 1 while in outage

pub mod handler;
pub mod types;

pub use types::*;

use crate::status::StatusBoard;
use std::sync::Arc;
use std::time::Instant;

pub const TOTAL_CHECKS: &str = "webpage_total_checks";
pub const SUCCESS_CHECKS: &str = "webpage_success_checks";
pub const AVAILABILITY_PERCENT: &str = "webpage_availability_percent";
pub const RESPONSE_TIME_SECONDS: &str = "webpage_response_time_seconds";
pub const LAST_STATUS_CODE: &str = "webpage_last_status_code";
pub const CONSECUTIVE_FAILURES: &str = "webpage_consecutive_failures";
pub const OUTAGE_ACTIVE: &str = "webpage_outage_active";
pub const OUTAGES_TOTAL: &str = "webpage_outages_total";

/// Prometheus client default buckets, in seconds.
pub const RESPONSE_TIME_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Shared state behind the exposure endpoint.
pub struct MetricsState {
    /// Per-target status written by the monitors
    status: Arc<StatusBoard>,
    /// Process start, for uptime reporting
    start_time: Instant,
    /// Prometheus handle for rendering metrics
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsState {
    pub fn new(
        status: Arc<StatusBoard>,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            status,
            start_time,
            prometheus_handle,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn status(&self) -> &Arc<StatusBoard> {
        &self.status
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Register help text for every instrument.
pub fn describe_metrics() {
    metrics::describe_counter!(TOTAL_CHECKS, "Total number of checks performed");
    metrics::describe_counter!(SUCCESS_CHECKS, "Number of successful checks");
    metrics::describe_counter!(OUTAGES_TOTAL, "Number of outages opened");
    metrics::describe_gauge!(
        AVAILABILITY_PERCENT,
        "Availability of the webpage in percent"
    );
    metrics::describe_gauge!(
        LAST_STATUS_CODE,
        "Last HTTP status code returned by the webpage"
    );
    metrics::describe_gauge!(CONSECUTIVE_FAILURES, "Current run of failed checks");
    metrics::describe_gauge!(OUTAGE_ACTIVE, "1 while the target is in outage, else 0");
    metrics::describe_histogram!(
        RESPONSE_TIME_SECONDS,
        metrics::Unit::Seconds,
        "Response time of the webpage in seconds"
    );
}

/// Install the global Prometheus recorder with the response-time buckets.
///
/// Returns a PrometheusHandle that can be used to render metrics.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(RESPONSE_TIME_SECONDS.to_string()),
            RESPONSE_TIME_BUCKETS,
        )?
        .install_recorder()?;

    describe_metrics();
    Ok(handle)
}
