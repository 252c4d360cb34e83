//! Error types and handling for the Tempo rate adapter
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Tempo operations
pub type Result<T> = std::result::Result<T, TempoError>;

/// Main error type for the Tempo rate adapter
#[derive(Debug, Error)]
pub enum TempoError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Network-related errors (connect, reset, TLS)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Token exchange errors
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Upstream answered with a non-success HTTP status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// Upstream body was JSON but not shaped like a calendar response
    #[error("Query failed: {message}")]
    Query { message: String },

    /// Calendar retrieval errors, after retries are exhausted
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// HTTP server errors
    #[error("Web server error: {message}")]
    Web { message: String },
}

impl TempoError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        TempoError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        TempoError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        TempoError::Io {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        TempoError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        TempoError::Network {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        TempoError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        TempoError::Auth {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn status<S: Into<String>>(status: u16, message: S) -> Self {
        TempoError::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        TempoError::Query {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        TempoError::Fetch {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        TempoError::Web {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TempoError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TempoError {
    fn from(err: std::io::Error) -> Self {
        TempoError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for TempoError {
    fn from(err: serde_yaml::Error) -> Self {
        TempoError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TempoError {
    fn from(err: serde_json::Error) -> Self {
        TempoError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TempoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TempoError::timeout(err.to_string());
        }
        if let Some(status) = err.status() {
            return TempoError::status(status.as_u16(), err.to_string());
        }
        TempoError::network(err.to_string())
    }
}
