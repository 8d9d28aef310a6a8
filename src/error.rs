//! Error types for rprefs library

use crate::store::NativeType;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rprefs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rprefs library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Accessor Errors
    // -------------------------------------------------------------------------
    #[error("Store cannot hold {native_type} values required by preference '{key}' ({type_name})")]
    UnsupportedType {
        key: String,
        type_name: String,
        native_type: NativeType,
    },

    #[error("Failed to persist preference '{key}': {reason}")]
    Persistence { key: String, reason: String },

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to decode preference '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("A missing {type_name} has no stored form; write it as a removal")]
    NullEncode { type_name: String },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error came from a failed store write
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Error::Persistence { .. } | Error::FileWrite { .. } | Error::DirectoryCreate { .. }
        )
    }

    /// Check if a codec recovers from this error by falling back to the default
    #[must_use]
    pub fn is_recoverable_decode(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::TypeMismatch { .. }
        )
    }

    /// Wrap any error raised while committing `key` into a [`Error::Persistence`].
    ///
    /// Errors that already are persistence errors are kept as-is.
    pub(crate) fn into_persistence(self, key: &str) -> Self {
        match self {
            Error::Persistence { .. } => self,
            other => Error::Persistence {
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
