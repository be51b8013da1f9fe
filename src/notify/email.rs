//! Email notifier backed by an HTTP mail relay.

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a [String],
    subject: String,
    text: &'a str,
}

/// Sends alerts as email through a relay that accepts JSON messages.
pub struct EmailNotifier {
    relay_url: String,
    from: String,
    to: Vec<String>,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(relay_url: String, from: String, to: Vec<String>, client: reqwest::Client) -> Self {
        Self {
            relay_url,
            from,
            to,
            client,
        }
    }

    fn subject(channel: &str) -> String {
        format!("[{}] outage alert", channel)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn deliver(&self, channel: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&RelayMessage {
                from: &self.from,
                to: &self.to,
                subject: Self::subject(channel),
                text: message,
            })
            .send()
            .await
            .map_err(NotifyError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            channel = channel,
            recipients = self.to.len(),
            "Email alert handed to relay"
        );
        Ok(())
    }
}
