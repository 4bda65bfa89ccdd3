//! Client error types.

use thiserror::Error;

/// Errors talking to the correlation service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: the service rejected the authentication token")]
    Unauthorized,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Polling already started")]
    AlreadyPolling,
}

impl ClientError {
    /// Errors after which retrying the poll is pointless.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::InvalidUrl(_))
    }
}
