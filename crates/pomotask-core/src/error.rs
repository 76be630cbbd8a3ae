//! Core error types for pomotask-core.
//!
//! Every fallible operation in the library returns one of these through the
//! crate-wide [`Result`] alias.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotask-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Settings or input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Remote backend errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
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

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Remote backend is not configured
    #[error("Remote backend not configured (set remote.url and remote.anon_key)")]
    RemoteNotConfigured,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A duration or count that must be at least one
    #[error("'{field}' must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    /// Input that could not be parsed as a number
    #[error("'{field}' must be a number, got '{input}'")]
    NotNumeric { field: &'static str, input: String },

    /// Value outside a fixed set of choices
    #[error("'{field}' must be one of {expected}, got '{input}'")]
    InvalidChoice {
        field: &'static str,
        expected: &'static str,
        input: String,
    },

    /// Referenced task does not exist
    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

/// Remote backend errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered with an unexpected body
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Base URL could not be joined with an endpoint path
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No signed-in session
    #[error("Not signed in")]
    NotSignedIn,

    /// Credentials were rejected
    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    /// Sign-up rejected by the backend
    #[error("Sign-up failed: {0}")]
    SignUpFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
