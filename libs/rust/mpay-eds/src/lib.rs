//! Client for the EDS service.
//!
//! Wraps the shared HTTP client factory with the EDS host and access token.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{EdsApi, EdsClient};
pub use config::EdsConfig;
pub use error::{EdsError, EdsResult};
