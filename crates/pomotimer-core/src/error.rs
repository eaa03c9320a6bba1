//! Core error types for pomotimer-core.
//!
//! Only configuration can fail: durations and the tick period are checked
//! once, when the scheduler is built. Everything after that is infallible.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration or tick period that is zero or otherwise unusable
    #[error("Invalid value for '{field}': {value} (must be a positive integer)")]
    InvalidDuration { field: &'static str, value: u64 },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
