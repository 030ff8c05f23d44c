//! Shared configuration, error handling, and extractors for the postback relay
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP status mapping
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat, StoreProvider};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
