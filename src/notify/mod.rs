//! Alert delivery.
//!
//! The monitor hands outage alerts to a [`Notifier`] trait object chosen from
//! configuration by [`build_notifier`]. Routing and delivery are entirely the
//! notifier's concern; the monitor only knows the channel and the message.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

mod config;
pub mod email;
mod error;
pub mod log;
pub mod webhook;

pub use config::{NotifierKind, NotifyConfig};
pub use email::EmailNotifier;
pub use error::NotifyError;
pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

/// Channel used for every outage alert.
pub const ALERT_CHANNEL: &str = "outage";

/// Destination for outage alerts.
///
/// Object-safe; used as `Arc<dyn Notifier>` and shared across target loops.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Short name for logs (e.g. "log", "webhook").
    fn name(&self) -> &str;

    /// Deliver `message` on `channel`.
    async fn deliver(&self, channel: &str, message: &str) -> Result<(), NotifyError>;
}

/// Create a notifier from configuration.
///
/// # Examples
///
/// ```
/// use page_monitor::notify::{build_notifier, NotifyConfig};
///
/// let notifier = build_notifier(&NotifyConfig::default()).unwrap();
/// assert_eq!(notifier.name(), "log");
/// ```
pub fn build_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Webhook => {
            let url = config.webhook_url.clone().ok_or_else(|| {
                NotifyError::Configuration("webhook notifier requires 'webhook_url'".to_string())
            })?;
            let client = build_client(config.timeout_seconds)?;
            Ok(Arc::new(WebhookNotifier::new(url, client)))
        }
        NotifierKind::Email => {
            let relay_url = config.relay_url.clone().ok_or_else(|| {
                NotifyError::Configuration("email notifier requires 'relay_url'".to_string())
            })?;
            let from = config.from.clone().ok_or_else(|| {
                NotifyError::Configuration("email notifier requires 'from'".to_string())
            })?;
            if config.to.is_empty() {
                return Err(NotifyError::Configuration(
                    "email notifier requires at least one 'to' address".to_string(),
                ));
            }
            let client = build_client(config.timeout_seconds)?;
            Ok(Arc::new(EmailNotifier::new(
                relay_url,
                from,
                config.to.clone(),
                client,
            )))
        }
    }
}

fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, NotifyError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| NotifyError::Configuration(format!("failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_log_notifier() {
        let notifier = build_notifier(&NotifyConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn test_build_webhook_requires_url() {
        let config = NotifyConfig {
            kind: NotifierKind::Webhook,
            ..Default::default()
        };
        let result = build_notifier(&config);
        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[test]
    fn test_build_webhook_notifier() {
        let config = NotifyConfig {
            kind: NotifierKind::Webhook,
            webhook_url: Some("http://hooks.example.test/T000".to_string()),
            ..Default::default()
        };
        let notifier = build_notifier(&config).unwrap();
        assert_eq!(notifier.name(), "webhook");
    }

    #[test]
    fn test_build_email_requires_recipients() {
        let config = NotifyConfig {
            kind: NotifierKind::Email,
            relay_url: Some("http://relay.test/send".to_string()),
            from: Some("monitor@example.com".to_string()),
            ..Default::default()
        };
        let result = build_notifier(&config);
        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[test]
    fn test_build_email_notifier() {
        let config = NotifyConfig {
            kind: NotifierKind::Email,
            relay_url: Some("http://relay.test/send".to_string()),
            from: Some("monitor@example.com".to_string()),
            to: vec!["oncall@example.com".to_string()],
            ..Default::default()
        };
        let notifier = build_notifier(&config).unwrap();
        assert_eq!(notifier.name(), "email");
    }
}
