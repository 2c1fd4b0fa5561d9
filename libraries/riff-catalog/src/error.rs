//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the song catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered but flagged the call as unsuccessful
    #[error("Catalog reported failure for {0}")]
    Unsuccessful(String),

    /// Non-2xx response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No song with this id
    #[error("Song not found: {0}")]
    NotFound(String),

    /// Failed to parse the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid base URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
