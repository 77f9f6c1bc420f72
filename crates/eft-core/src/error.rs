//! Error types for the EFT provider
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for EFT provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the EFT provider
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication against the admin API failed, or the session can no
    /// longer authenticate
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The admin API answered with a status >= 400
    #[error("Globalscape EFT API {method} {path} failed ({status}): {body}")]
    Request {
        /// HTTP method of the failed call
        method: String,
        /// Request path relative to the base URL
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, whitespace-trimmed
        body: String,
    },

    /// The request never produced a response (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed JSON, either supplied by the caller or returned by the API
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Caller-supplied configuration or plan values were rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource was used before the provider handed it a client
    #[error("Unconfigured client: {0}")]
    Unconfigured(String),

    /// An operation exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Unknown resource or data source type
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a request error from the failed call's diagnostics
    pub fn request(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        body: impl AsRef<str>,
    ) -> Self {
        Self::Request {
            method: method.into(),
            path: path.into(),
            status,
            body: body.as_ref().trim().to_string(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unconfigured-client error
    pub fn unconfigured(msg: impl Into<String>) -> Self {
        Self::Unconfigured(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status of a failed API call, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the admin API reported the object as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
