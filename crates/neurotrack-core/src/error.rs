//! Core error types for neurotrack-core.
//!
//! Timer operations are total and never fail. Everything that can fail
//! (storage, configuration, store lookups, reordering, speech) reports
//! through the types below.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for neurotrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store lookups and mutations
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Speech synthesis errors
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be created
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from reordering a sibling collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("item not found: {id}")]
    ItemNotFound { id: String },
}

/// Lookup failures in the in-memory stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("routine not found: {0}")]
    RoutineNotFound(String),

    #[error("mood entry not found: {0}")]
    EntryNotFound(String),

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Speech synthesis errors.
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Backend is missing credentials or a player
    #[error("{backend} is not configured: {message}")]
    NotConfigured { backend: String, message: String },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("speech service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// External player or TTS command failed
    #[error("`{command}` failed: {message}")]
    Player { command: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Primary and fallback both failed
    #[error("speech failed ({primary}); fallback failed ({fallback})")]
    AllBackendsFailed { primary: String, fallback: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<OrderError> for CoreError {
    fn from(err: OrderError) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
