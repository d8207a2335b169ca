//! Storage error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur in the storage area and profile store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage file exists but does not hold a valid key-value map
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// Write would push the area past its configured quota
    #[error("Storage quota exceeded: {used} of {quota} bytes used, write needs {needed}")]
    QuotaExceeded {
        quota: usize,
        used: usize,
        needed: usize,
    },

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
