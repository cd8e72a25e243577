//! Core error types for chill-core.
//!
//! Construction problems surface as [`ConfigError`] and fail fast at startup.
//! A break request with nothing to choose from surfaces as [`BreakError`] and
//! leaves the shared state untouched. Counter arithmetic itself never fails:
//! out-of-range results are clamped.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chill-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Break request errors
    #[error("Break error: {0}")]
    Break(#[from] BreakError),

    /// A request named no known break kind
    #[error("unknown break kind '{0}' (try `chill list`)")]
    UnknownKind(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Errors returned by a break request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakError {
    /// The caller supplied no (message, summary) candidates.
    #[error("Break options must not be empty")]
    EmptyOptions,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
