//! Error types for playback management

use thiserror::Error;

/// Errors reported by an audio driver
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// The stream could not be opened or decoded
    #[error("Failed to load stream: {0}")]
    Load(String),

    /// The driver rejected a command for this session
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The session was already released
    #[error("Driver session closed")]
    Closed,
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The synchronizer loop has stopped accepting commands
    #[error("Player loop is no longer running")]
    Closed,

    /// Audio driver failure
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
