/// Errors from key-value storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key is empty or contains characters the backend cannot store.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("storage is read-only")]
    ReadOnly,

    /// The stored bytes are not valid UTF-8 text.
    #[error("stored value for {key:?} is not valid UTF-8")]
    NotText { key: String },

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
