//! Error model used by YouTrack hook operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YouTrackError>;

/// Represents the failure modes of a hook operation: invalid settings, rejected logins,
/// non-success HTTP statuses, transport problems and malformed payloads.
#[derive(Debug, Error)]
pub enum YouTrackError {
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("issue was created but the response carried no location")]
    MissingLocation,
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unsupported event: {0}")]
    UnsupportedEvent(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl YouTrackError {
    /// Constructs an HTTP error variant from a response status and body.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        YouTrackError::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for YouTrackError {
    /// Converts reqwest errors into semantic YouTrackError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            YouTrackError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            YouTrackError::http(status, err.to_string())
        } else if err.is_connect() || err.is_request() {
            YouTrackError::Network(err.to_string())
        } else if err.is_builder() {
            YouTrackError::Settings(err.to_string())
        } else {
            YouTrackError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for YouTrackError {
    fn from(err: serde_json::Error) -> Self {
        YouTrackError::Serialization(err.to_string())
    }
}
