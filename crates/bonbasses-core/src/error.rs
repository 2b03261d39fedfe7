//! Core error types for bonbasses-core.
//!
//! Errors only arise at the collaborator edges (preference files, hint
//! content, draft persistence). The session engine itself never surfaces
//! them: callers map every failure to a safe default.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bonbasses-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Preference store errors
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Preference-store specific errors.
#[derive(Error, Debug)]
pub enum PreferencesError {
    /// The data directory could not be resolved or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the preferences file
    #[error("Failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preferences file exists but is not valid TOML
    #[error("Failed to parse preferences at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Failed to serialize preferences
    #[error("Failed to serialize preferences: {0}")]
    Serialize(String),

    /// Failed to write the preferences file
    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<toml::ser::Error> for PreferencesError {
    fn from(err: toml::ser::Error) -> Self {
        PreferencesError::Serialize(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
