//! Error types for alert delivery.

use thiserror::Error;

/// Errors that can occur while delivering an alert.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The destination could not be reached
    #[error("Delivery failed: {0}")]
    Transport(String),

    /// The destination answered with a non-success status
    #[error("Destination rejected alert {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The notifier is missing required settings
    #[error("Notifier configuration error: {0}")]
    Configuration(String),
}

impl NotifyError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NotifyError::Transport(format!("timeout: {}", e))
        } else {
            NotifyError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = NotifyError::Rejected {
            status: 403,
            body: "invalid_token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Destination rejected alert 403: invalid_token"
        );
    }

    #[test]
    fn test_configuration_display() {
        let err = NotifyError::Configuration("webhook_url is required".to_string());
        assert_eq!(
            err.to_string(),
            "Notifier configuration error: webhook_url is required"
        );
    }
}
