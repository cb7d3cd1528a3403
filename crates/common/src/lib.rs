//! Shared utilities, configuration, and error handling for Teamdesk
//!
//! This crate provides common functionality used across the Teamdesk application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The `{data, error}` response envelope

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;

pub use db::RepositoryError;
pub use envelope::{BareError, Envelope, ErrorBody};
pub use error::{Error, Result};
