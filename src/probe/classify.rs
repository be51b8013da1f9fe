//! Outcome classification.

use super::result::{ErrorKind, RawOutcome, TransportFailure};
use crate::metrics::LAST_STATUS_CODE;
use serde::{Deserialize, Serialize};

/// Which HTTP status codes count as a successful check.
///
/// Codes >= 500 are failures under every policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Only 2xx responses succeed
    #[default]
    Strict,
    /// 2xx plus the listed codes (e.g. 401 for an auth-protected page)
    AllowList { codes: Vec<u16> },
}

impl StatusPolicy {
    pub fn is_success_code(&self, code: u16) -> bool {
        if code >= 500 {
            return false;
        }
        if (200..300).contains(&code) {
            return true;
        }
        match self {
            StatusPolicy::Strict => false,
            StatusPolicy::AllowList { codes } => codes.contains(&code),
        }
    }
}

/// Verdict for a single raw outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub success: bool,
    pub error_kind: ErrorKind,
}

/// Maps raw outcomes to success/failure for one target.
#[derive(Debug, Clone)]
pub struct Classifier {
    target: String,
    policy: StatusPolicy,
}

impl Classifier {
    pub fn new(target: impl Into<String>, policy: StatusPolicy) -> Self {
        Self {
            target: target.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }

    /// Classify an outcome, updating the last-status gauge when a code is present.
    pub fn classify(&self, outcome: &RawOutcome) -> Classification {
        match *outcome {
            RawOutcome::Status(code) => {
                metrics::gauge!(LAST_STATUS_CODE, "target" => self.target.clone())
                    .set(code as f64);
                Classification {
                    success: self.policy.is_success_code(code),
                    error_kind: ErrorKind::None,
                }
            }
            RawOutcome::Transport(TransportFailure::Timeout) => Classification {
                success: false,
                error_kind: ErrorKind::Timeout,
            },
            RawOutcome::Transport(TransportFailure::Network) => Classification {
                success: false,
                error_kind: ErrorKind::Network,
            },
        }
    }
}
