//! Log-only notifier.

use super::{Notifier, NotifyError};
use async_trait::async_trait;

/// Writes alerts to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, channel: &str, message: &str) -> Result<(), NotifyError> {
        tracing::warn!(channel = channel, "ALERT: {}", message);
        Ok(())
    }
}
