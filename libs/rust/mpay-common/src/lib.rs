//! Shared library for cross-cutting concerns in mpay Rust services.
//!
//! This crate provides centralized implementations for:
//! - gRPC to HTTP / API error code translation
//! - Client-facing API errors with a fixed JSON wire shape
//! - Decoding of error payloads returned by remote services
//! - HTTP client configuration and building
//! - Structured logging with explicit, immutable logging contexts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api_error;
pub mod client_error;
pub mod codes;
pub mod duration;
pub mod error;
pub mod http;
pub mod logging;

pub use api_error::{ApiError, BoxError};
pub use client_error::ClientError;
pub use error::{CommonError, CommonResult};
pub use http::{ClientConfig, ClientOption, HttpSettings, ServiceClient, TransportConfig};
pub use logging::{LogConfig, LogContext, LogLevel, LogLevelHandle, Logger, init_logging};
