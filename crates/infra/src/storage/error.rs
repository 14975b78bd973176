//! Errors raised by key/value backends.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error while reading or writing a key's file.
    #[error("I/O error for key {key} at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters a backend cannot store.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Error serializing a value before writing it.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored value could not be decoded.
    #[error("deserialization error for key {key}: {message}")]
    Deserialization { key: String, message: String },

    /// Backend cannot serve requests (e.g. poisoned lock, quota exhausted).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(key: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            path: path.into(),
            source,
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn deserialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
