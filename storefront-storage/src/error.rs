//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding in-memory storage was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,

    /// The key cannot be used by this store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    /// Short machine-readable label, for UI messages and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::LockPoisoned => "lock_poisoned",
            Self::InvalidKey(_) => "invalid_key",
        }
    }
}
