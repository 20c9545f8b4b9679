//! Client error types

use thiserror::Error;

/// Error raised by the remote database layer
///
/// `Clone` so the in-memory backend can replay injected failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Malformed path, id or query
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Document or collection not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Security rules rejected the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Backend unreachable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
