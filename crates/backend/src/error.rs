//! Error types for the backend crate.

use studyshare_core::errors::{Error as CoreError, RemoteError, ValidationError};
use thiserror::Error;

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API error response from the table API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid request (bad configuration, unusable filter, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Websocket or channel protocol failure
    #[error("Realtime error: {0}")]
    Realtime(String),
}

impl BackendError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a realtime error
    pub fn realtime(message: impl Into<String>) -> Self {
        Self::Realtime(message.into())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BackendError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Realtime(err.to_string())
    }
}

impl From<BackendError> for CoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Http(e) => RemoteError::RequestFailed(e.to_string()).into(),
            BackendError::Json(e) => RemoteError::Decode(e.to_string()).into(),
            BackendError::Api { status, message } => RemoteError::Api { status, message }.into(),
            BackendError::InvalidRequest(message) => ValidationError::InvalidInput(message).into(),
            BackendError::Realtime(message) => RemoteError::Channel(message).into(),
        }
    }
}
