//! Failures raised by the library's own operations.
//!
//! Building an HTTP client, decoding a peer's error body, or installing the
//! logger can fail. Those failures are reported through [`CommonError`].
//! Failures that cross the service boundary use
//! [`ApiError`](crate::ApiError) instead.

use thiserror::Error;

/// Error type for mpay-common operations.
#[derive(Error, Debug)]
pub enum CommonError {
    /// HTTP client construction or request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base URL or endpoint path could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Log level string not recognised
    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),

    /// Logger could not be installed or reconfigured
    #[error("Logger initialization failed: {0}")]
    LoggerInit(String),
}

/// Result type for mpay-common operations.
pub type CommonResult<T> = Result<T, CommonError>;

impl CommonError {
    /// Create an invalid log level error.
    #[must_use]
    pub fn invalid_log_level(level: impl Into<String>) -> Self {
        Self::InvalidLogLevel(level.into())
    }

    /// Create a logger initialization error.
    #[must_use]
    pub fn logger_init(msg: impl Into<String>) -> Self {
        Self::LoggerInit(msg.into())
    }
}
