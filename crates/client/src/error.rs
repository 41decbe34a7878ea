//! Client error types.

use thiserror::Error;

/// Errors raised while talking to the discount backend.
///
/// These never leave the validation or application clients; they are
/// converted into result values at that boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned HTTP {status}")]
    Http { status: u16 },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Parse(String),

    /// The GraphQL layer reported errors instead of data.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// No response arrived within the configured timeout.
    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Convenience type alias for client results.
pub type Result<T> = std::result::Result<T, ClientError>;
