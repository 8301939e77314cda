//! Error lines for failed operations.

use std::fmt;

use crate::error::AtlasError;

/// How an operation ended, as far as the caller is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request itself was wrong; repeating it will not help
    Rejected,
    /// Repeating the request may succeed
    Retry,
    Failure,
}

/// One-line status message.
pub struct OperationStatus {
    pub message: String,
    pub outcome: Outcome,
}

impl OperationStatus {
    /// Classifies an error the way callers should react to it.
    pub fn from_error(error: &AtlasError) -> Self {
        let outcome = if error.is_client_error() {
            Outcome::Rejected
        } else if error.is_transient() {
            Outcome::Retry
        } else {
            Outcome::Failure
        };
        Self {
            message: error.to_string(),
            outcome,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.outcome {
            Outcome::Rejected => "Rejected:",
            Outcome::Retry => "Busy, try again:",
            Outcome::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}
