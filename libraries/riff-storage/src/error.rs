/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error from the embedded database
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned
    #[error("Storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Wrap any redb error type
    pub(crate) fn database(err: impl Into<redb::Error>) -> Self {
        Self::Database(err.into())
    }
}

impl From<StorageError> for riff_core::CoreError {
    fn from(err: StorageError) -> Self {
        riff_core::CoreError::storage(err.to_string())
    }
}
