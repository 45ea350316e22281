//! Core error types for campusboard-core.
//!
//! Every anticipated failure is a typed outcome. Problems that are recovered
//! locally while loading the event file are not errors at all; they are
//! reported as [`LoadWarning`](crate::storage::LoadWarning)s instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::EventRef;

/// Core error type for campusboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A thread panicked while holding the catalog lock
    #[error("Catalog lock poisoned")]
    LockPoisoned,
}

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Update or delete target does not exist
    #[error("Event not found: {0}")]
    NotFound(EventRef),

    /// Rename would collide with another event's key
    #[error("An event named '{0}' already exists")]
    DuplicateName(String),

    /// Failed to write the event file
    #[error("Failed to save events to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Failed to access data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for untyped event input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Event name is blank
    #[error("Event name must not be empty")]
    EmptyName,

    /// Date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl<T> From<std::sync::PoisonError<T>> for CoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        CoreError::LockPoisoned
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
