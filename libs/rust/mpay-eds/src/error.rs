//! EDS client error types.

use mpay_common::CommonError;
use thiserror::Error;

/// EDS-specific errors.
#[derive(Error, Debug)]
pub enum EdsError {
    /// Configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration was read but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shared client error
    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for EDS operations.
pub type EdsResult<T> = Result<T, EdsError>;

impl EdsError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
