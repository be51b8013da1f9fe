//! Configuration module for page-monitor
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PAGE_MONITOR_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use page_monitor::config::{HealthPolicy, MonitorConfig};
//!
//! let toml = r#"
//! [[targets]]
//! url = "http://localhost:8080"
//!
//! [targets.policy]
//! kind = "consecutive_failures"
//! failure_threshold = 5
//! "#;
//! let config: MonitorConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 2112);
//! assert_eq!(
//!     config.targets[0].policy,
//!     HealthPolicy::ConsecutiveFailures { failure_threshold: 5 }
//! );
//! assert!(config.validate().is_ok());
//! ```

pub mod error;
pub mod logging;
pub mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::{ServerConfig, DEFAULT_METRICS_PORT};

pub use crate::health::{HealthPolicy, TargetConfig};
pub use crate::notify::{NotifierKind, NotifyConfig};
pub use crate::probe::StatusPolicy;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes tests that read or write `PAGE_MONITOR_*` variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Top-level configuration: exposure endpoint, logging, alert delivery and targets.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Metrics exposure endpoint
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Where outage alerts go
    pub notify: NotifyConfig,
    /// Monitored targets, one loop each
    pub targets: Vec<TargetConfig>,
}

impl MonitorConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `PAGE_MONITOR_*` environment overrides.
    ///
    /// Unparseable values are ignored and the current setting is kept.
    /// `PAGE_MONITOR_URL` only adds a target when none are configured.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("PAGE_MONITOR_URL") {
            if self.targets.is_empty() && !url.is_empty() {
                self.targets.push(TargetConfig::for_url(url));
            }
        }
        if let Ok(interval) = std::env::var("PAGE_MONITOR_INTERVAL") {
            if let Ok(secs) = interval.parse::<u64>() {
                for target in &mut self.targets {
                    target.interval_seconds = secs;
                }
            }
        }

        if let Ok(port) = std::env::var("PAGE_MONITOR_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(level) = std::env::var("PAGE_MONITOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PAGE_MONITOR_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration. Called once before any monitor starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.enabled && self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.server.enabled {
            self.server
                .socket_addr()
                .map_err(|e| ConfigError::invalid("server.host", e.to_string()))?;
        }

        if self.targets.is_empty() {
            return Err(ConfigError::MissingField("targets".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for (i, target) in self.targets.iter().enumerate() {
            validate_target(i, target)?;
            // URL is the metric label and status key
            if !seen.insert(target.url.as_str()) {
                return Err(ConfigError::invalid(
                    format!("targets[{}].url", i),
                    format!("duplicate target {}", target.url),
                ));
            }
        }

        self.validate_notify()
    }

    fn validate_notify(&self) -> Result<(), ConfigError> {
        let notify = &self.notify;
        match notify.kind {
            NotifierKind::Log => Ok(()),
            NotifierKind::Webhook => {
                let url = notify
                    .webhook_url
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingField("notify.webhook_url".to_string()))?;
                validate_http_url("notify.webhook_url", url)
            }
            NotifierKind::Email => {
                let relay = notify
                    .relay_url
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingField("notify.relay_url".to_string()))?;
                validate_http_url("notify.relay_url", relay)?;
                if notify.from.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::MissingField("notify.from".to_string()));
                }
                if notify.to.is_empty() {
                    return Err(ConfigError::invalid(
                        "notify.to",
                        "at least one recipient is required",
                    ));
                }
                Ok(())
            }
        }
    }
}

fn validate_target(i: usize, target: &TargetConfig) -> Result<(), ConfigError> {
    let field = |name: &str| format!("targets[{}].{}", i, name);

    if target.url.is_empty() {
        return Err(ConfigError::invalid(field("url"), "URL cannot be empty"));
    }
    validate_http_url(&field("url"), &target.url)?;

    if target.interval_seconds == 0 {
        return Err(ConfigError::invalid(
            field("interval_seconds"),
            "interval must be greater than zero",
        ));
    }
    if target.timeout_seconds == 0 {
        return Err(ConfigError::invalid(
            field("timeout_seconds"),
            "timeout must be greater than zero",
        ));
    }

    match &target.policy {
        HealthPolicy::Windowed {
            window_seconds,
            availability_threshold,
        } => {
            if *window_seconds == 0 {
                return Err(ConfigError::invalid(
                    field("policy.window_seconds"),
                    "window must be greater than zero",
                ));
            }
            if !(0.0..=100.0).contains(availability_threshold) {
                return Err(ConfigError::invalid(
                    field("policy.availability_threshold"),
                    format!("{} is not a percentage (0-100)", availability_threshold),
                ));
            }
        }
        HealthPolicy::ConsecutiveFailures { failure_threshold } => {
            if *failure_threshold == 0 {
                return Err(ConfigError::invalid(
                    field("policy.failure_threshold"),
                    "failure threshold must be greater than zero",
                ));
            }
        }
    }

    if let StatusPolicy::AllowList { codes } = &target.status_policy {
        if let Some(code) = codes.iter().find(|c| !(100..=599).contains(*c)) {
            return Err(ConfigError::invalid(
                field("status_policy.codes"),
                format!("{} is not an HTTP status code", code),
            ));
        }
    }

    Ok(())
}

fn validate_http_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| ConfigError::invalid(field, format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::invalid(
            field,
            format!("unsupported scheme '{}', expected http or https", other),
        )),
    }
}
