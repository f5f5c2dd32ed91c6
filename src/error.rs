//! Error types and handling for the stormwatch service

use thiserror::Error;

/// Main error type for the stormwatch service
#[derive(Error, Debug)]
pub enum StormError {
    /// A dependent upstream call failed (network, timeout, status or body)
    #[error("Upstream error from {service}: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// The upstream answered successfully but had nothing for the location
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Missing or malformed query parameters
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl StormError {
    /// Create a new upstream error for the named service
    pub fn upstream<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query<S: Into<String>>(message: S) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            StormError::Upstream { .. } => {
                "Unable to reach the weather services. Please try again later.".to_string()
            }
            StormError::NotFound { message } => message.clone(),
            StormError::InvalidQuery { message } => format!("Invalid query: {message}"),
            StormError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}

/// Reqwest errors carry the request URL, which may hold an API key.
impl From<reqwest::Error> for StormError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_decode() {
            format!("malformed response body: {err}")
        } else {
            err.to_string()
        };
        StormError::upstream("http", message)
    }
}
