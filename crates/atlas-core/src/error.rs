//! Error types for the orchestration core.
//!
//! Specialist failures are deliberately absent from this enum: they are
//! values ([`crate::specialist::Failure`]) that degrade a plan rather than
//! errors that abort a request.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{PlanId, PlanStatus};

/// Comprehensive error type for all orchestrator and store operations.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Malformed or missing required input
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// No plan exists for the given ID
    #[error("Plan {plan_id} not found")]
    NotFound { plan_id: PlanId },
    /// Operation is not legal for the plan's current status
    #[error("Cannot {operation} plan {plan_id} in status '{status}': {reason}")]
    InvalidState {
        plan_id: PlanId,
        status: PlanStatus,
        operation: String,
        reason: String,
    },
    /// A plan with the same ID already exists
    #[error("Plan {plan_id} already exists")]
    Conflict { plan_id: PlanId },
    /// Compare-and-swap rejected because the turn moved on
    #[error("Plan {plan_id} was modified concurrently (expected turn {expected_turn}, found {actual_turn})")]
    ConcurrentModification {
        plan_id: PlanId,
        expected_turn: u64,
        actual_turn: u64,
    },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Unexpected fault inside the orchestrator
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> AtlasError {
        AtlasError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> AtlasError {
        AtlasError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl AtlasError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates an invalid-state error for `operation` against a plan.
    pub fn invalid_state(
        plan_id: &PlanId,
        status: PlanStatus,
        operation: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            plan_id: plan_id.clone(),
            status,
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an internal error from any displayable message.
    pub fn internal(message: impl fmt::Display) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Errors caused by the request itself; never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::InvalidState { .. }
                | Self::Conflict { .. }
        )
    }

    /// Errors that may succeed if the caller simply tries again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| AtlasError::database(message).with_source(e))
    }
}

/// Extension trait for mapping blocking-task join failures.
pub trait JoinResultExt<T> {
    /// Convert a `JoinError` into a configuration error.
    fn join_context(self) -> Result<T>;
}

impl<T> JoinResultExt<T> for std::result::Result<T, tokio::task::JoinError> {
    fn join_context(self) -> Result<T> {
        self.map_err(|e| AtlasError::Configuration {
            message: format!("Task join error: {e}"),
        })
    }
}

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let id = PlanId::from("p-1");
        assert!(AtlasError::validation("goal")
            .with_reason("empty")
            .is_client_error());
        assert!(AtlasError::NotFound {
            plan_id: id.clone()
        }
        .is_client_error());
        assert!(
            AtlasError::invalid_state(&id, PlanStatus::Completed, "continue", "terminal")
                .is_client_error()
        );

        let cas = AtlasError::ConcurrentModification {
            plan_id: id,
            expected_turn: 1,
            actual_turn: 2,
        };
        assert!(cas.is_transient());
        assert!(!cas.is_client_error());
        assert!(!AtlasError::internal("boom").is_transient());
    }

    #[test]
    fn test_invalid_state_message() {
        let err = AtlasError::invalid_state(
            &PlanId::from("abc"),
            PlanStatus::Failed,
            "finalize",
            "plan is terminal",
        );
        assert_eq!(
            err.to_string(),
            "Cannot finalize plan abc in status 'failed': plan is terminal"
        );
    }
}
