//! Error types and handling for the sunny notification pipeline

use thiserror::Error;

/// Message every caller sees when a forecast could not be fetched.
pub const FETCH_FAILURE_MESSAGE: &str = "Get weather failed due to network error.";

/// Terminal failure of a forecast fetch, after all retries.
///
/// Deliberately carries no cause: the cause is logged where it happens. It is
/// `Clone` because every waiter on a shared fetch receives its own copy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchFailure {
    message: String,
}

impl FetchFailure {
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: FETCH_FAILURE_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for FetchFailure {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a single fetch attempt against the provider failed
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Unexpected HTTP status: {status}")]
    Status { status: u16 },

    /// Body could not be decoded into the forecast schema
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Main error type for the sunny notification pipeline
#[derive(Error, Debug)]
pub enum SunnyError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Forecast could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    /// Provider payload does not match the expected schema or alignment
    #[error("Malformed forecast payload: {message}")]
    MalformedPayload { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl SunnyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new malformed payload error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SunnyError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            SunnyError::Fetch(failure) => failure.message().to_string(),
            SunnyError::MalformedPayload { .. } => {
                "The weather service returned data that could not be understood.".to_string()
            }
            SunnyError::Validation { message } => message.clone(),
        }
    }
}
