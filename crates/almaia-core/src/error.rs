//! Core error types for almaia-core.
//!
//! This module defines the error hierarchy using thiserror. Wizard misuse,
//! HTTP collaborator failures, configuration problems and input validation
//! each get their own enum; [`CoreError`] wraps them all.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for almaia-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Wizard sequencing errors
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session token errors
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the question sequencer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Asked for a question past the end of the list.
    #[error("Question index {index} out of range (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The question's template code has no matching screen.
    #[error("Unknown template code: '{0}'")]
    UnknownTemplate(String),

    /// The same question id appears twice in one session.
    #[error("Duplicate question id {0} in question list")]
    DuplicateQuestionId(i64),

    /// A navigation payload does not describe a reachable state.
    #[error("Inconsistent navigation payload: {0}")]
    InconsistentPayload(String),
}

/// Errors from the backend HTTP collaborator.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 400 from the backend
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// 401 from the backend
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// 5xx from the backend
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status
    #[error("API request failed (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// A student-scoped call was attempted without a bearer token
    #[error("No authentication token available")]
    MissingToken,

    /// Transport-level failure
    #[error("Could not reach the server: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint URL could not be built
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body was not the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty input where content is required
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Input shorter than the allowed minimum
    #[error("{field} must have at least {min} characters (got {len})")]
    TooShort { field: String, min: usize, len: usize },

    /// Input longer than the allowed maximum
    #[error("{field} must have at most {max} characters (got {len})")]
    TooLong { field: String, max: usize, len: usize },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Bearer token inspection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated segments
    #[error("Token is not a JWT (expected 3 segments, got {0})")]
    NotJwt(usize),

    /// Payload segment is not valid base64
    #[error("Token payload is not valid base64")]
    BadEncoding,

    /// Payload is not JSON or lacks a numeric `exp`
    #[error("Token payload has no usable 'exp' claim")]
    MissingExpiry,
}

/// A record from the backend that had to be repaired with defaults.
///
/// Never raised: normalization reports these next to the repaired records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed {kind} record at index {index}: {reason}")]
pub struct MalformedRecord {
    pub kind: &'static str,
    pub index: usize,
    pub reason: String,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_error_wraps_into_core_error() {
        let err: CoreError = WizardError::IndexOutOfRange { index: 3, len: 3 }.into();
        assert_eq!(
            err.to_string(),
            "Wizard error: Question index 3 out of range (length: 3)"
        );
    }

    #[test]
    fn malformed_record_display() {
        let rec = MalformedRecord {
            kind: "task",
            index: 2,
            reason: "invalid type".to_string(),
        };
        assert_eq!(rec.to_string(), "Malformed task record at index 2: invalid type");
    }
}
