/// Core error types for Riff Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared across crates
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage failure (read or write)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted data could not be (de)serialized
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
