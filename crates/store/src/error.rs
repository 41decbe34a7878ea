//! Store error types.

use thiserror::Error;

/// Errors raised while writing the applied discount to durable storage.
///
/// Reads never fail: unreadable data is treated as absent.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage medium could not be written.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The discount could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors returned by [`crate::CheckoutSession`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A validation is already running for this session.
    #[error("A discount validation is already in progress")]
    ValidationInProgress,
}
