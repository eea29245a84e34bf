//! Core error types for stayactive-core.
//!
//! Duration adjustments never fail (they are clamped), and cancellation is
//! not an error. What remains are configuration problems at startup and
//! faults of the pointer/display capabilities during a tick, which end the
//! activity loop.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stayactive-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The pointer-nudge capability failed
    #[error("Pointer nudge failed: {0}")]
    Nudge(#[from] NudgeError),

    /// The display sink failed
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    /// The key input source failed
    #[error("Input error: {0}")]
    Input(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
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

/// Pointer-nudge errors.
#[derive(Error, Debug)]
pub enum NudgeError {
    /// The platform rejected the injected input
    #[error("platform rejected input injection: {0}")]
    Rejected(String),

    /// No pointer device is available to move
    #[error("pointer device unavailable")]
    Unavailable,
}

/// Display sink errors.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Writing to the terminal failed
    #[error("terminal write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
