//! Error types for the inkcrate crate

use thiserror::Error;

/// Result type for inkcrate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for inkcrate operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fetching a remote resource failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Writing to the package or data directories failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catalog table listing error
    #[error("List error: {0}")]
    List(String),

    /// Detail record gathering error
    #[error("Gather error: {0}")]
    Gather(String),

    /// RO-Crate packaging error
    #[error("Package error: {0}")]
    Package(String),
}
