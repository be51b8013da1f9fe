//! Alert delivery configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which destination outage alerts are delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    /// Write alerts to the log only
    #[default]
    Log,
    /// POST to a chat webhook (Slack-compatible payload)
    Webhook,
    /// POST to an HTTP mail relay
    Email,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(NotifierKind::Log),
            "webhook" => Ok(NotifierKind::Webhook),
            "email" => Ok(NotifierKind::Email),
            _ => Err(format!("Invalid notifier kind: {}", s)),
        }
    }
}

/// Notifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub kind: NotifierKind,
    /// Chat webhook URL (webhook only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Mail relay endpoint (email only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
    /// Sender address (email only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipient addresses (email only)
    pub to: Vec<String>,
    /// Timeout for each delivery request
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::Log,
            webhook_url: None,
            relay_url: None,
            from: None,
            to: Vec::new(),
            timeout_seconds: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_config_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.kind, NotifierKind::Log);
        assert!(config.webhook_url.is_none());
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_notifier_kind_from_str() {
        assert_eq!(NotifierKind::from_str("log").unwrap(), NotifierKind::Log);
        assert_eq!(
            NotifierKind::from_str("WEBHOOK").unwrap(),
            NotifierKind::Webhook
        );
        assert_eq!(NotifierKind::from_str("email").unwrap(), NotifierKind::Email);
        assert!(NotifierKind::from_str("pager").is_err());
    }

    #[test]
    fn test_notify_config_toml() {
        let config: NotifyConfig = toml::from_str(
            r#"
            kind = "email"
            relay_url = "http://relay.internal/send"
            from = "monitor@example.com"
            to = ["oncall@example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.kind, NotifierKind::Email);
        assert_eq!(config.to, vec!["oncall@example.com".to_string()]);
        assert_eq!(config.timeout_seconds, 10);
    }
}
