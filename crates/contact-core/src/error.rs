//! Error types for the contact pipeline
//!
//! Each stage of a submission has its own error type so the caller can tell
//! a client fault (bad form data) from a server fault (storage) and from a
//! fault that never reaches the client at all (notification).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field (`"body"` when the payload itself is malformed)
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Malformed or incomplete form data
///
/// Always carries at least one [`FieldError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid form data: {} field error(s)", .errors.len())]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Create an error for a single field
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, reason)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Names of the failing fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

/// Persistence layer faults
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store cannot serve requests (poisoned lock, exhausted id space, closed backend)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Error raised by the sled backend
    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    /// A record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StorageError::Unavailable(msg.into())
    }
}

/// Mail relay faults
///
/// These never reach the client; the dispatcher logs and counts them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Relay rejected the sender credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Relay could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Relay refused the send because of rate or quota limits
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Relay refused the message itself
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// Relay answered with a server error
    #[error("Relay unavailable: {0}")]
    RelayUnavailable(String),

    /// Transport could not be set up from the given configuration
    #[error("Transport misconfigured: {0}")]
    Misconfigured(String),
}

impl NotificationError {
    /// Stable label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationError::AuthenticationFailed(_) => "authentication",
            NotificationError::Network(_) => "network",
            NotificationError::QuotaExceeded(_) => "quota",
            NotificationError::Rejected(_) => "rejected",
            NotificationError::RelayUnavailable(_) => "relay_unavailable",
            NotificationError::Misconfigured(_) => "misconfigured",
        }
    }
}

/// Errors that end a submission before it is accepted
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SubmissionError {
    /// Check if the caller caused this error (vs a server fault)
    pub fn is_client_fault(&self) -> bool {
        matches!(self, SubmissionError::Validation(_))
    }
}

/// Startup configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StorageError>;
