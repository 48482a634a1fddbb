//! Shared test utilities for mpay Rust libraries.
//!
//! This crate provides:
//! - Proptest generators for status codes, messages and error details
//! - Test fixtures with sample payloads and configuration files

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
