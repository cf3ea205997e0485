//! Core error types for the StudyShare client.
//!
//! This module defines backend-agnostic error types. Transport-specific errors
//! (HTTP, websocket, JSON decoding of remote bodies) are converted to these
//! types by the backend crate.

use chrono::ParseError as ChronoParseError;
use std::num::ParseIntError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Remote data operation failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Local storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Planner error: {0}")]
    Planner(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors reported by the hosted data collaborator.
///
/// Every variant carries its details as strings so that the backend crate can
/// map reqwest/websocket failures into it without leaking those types here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The request never produced a response (connection, DNS, TLS).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The collaborator answered with a structured error.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body or row could not be decoded into the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// An update or lookup matched no row.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The realtime channel could not be joined or was closed.
    #[error("Realtime channel error: {0}")]
    Channel(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Year filter '{0}' is not a number")]
    InvalidYear(String),

    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseIntError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

/// Errors raised by client-local persisted state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored blob for '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("Stored blob for '{key}' has version {found}, newer than supported {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    #[error("No migration registered from version {0}")]
    MissingMigration(u32),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Create a missing-field validation error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Validation(ValidationError::MissingField(field.into()))
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Remote(RemoteError::Decode(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err: Error = RemoteError::Api {
            status: 404,
            message: "relation \"notes\" does not exist".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Remote data operation failed: API error (404): relation \"notes\" does not exist"
        );
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let json_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Remote(RemoteError::Decode(_))));
    }
}
