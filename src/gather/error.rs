//! Error types for the gather module

use crate::error::Error as CrateError;
use crate::http::FetchError;
use crate::storage::StorageError;
use thiserror::Error;

/// Error type for gather operations
#[derive(Debug, Error)]
pub enum GatherError {
    /// Downloading a detail record failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Writing a detail record or the collection failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The data directory could not be read
    #[error("Cannot read data directory {path}: {source}")]
    DataDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GatherError> for CrateError {
    fn from(err: GatherError) -> Self {
        match err {
            GatherError::Fetch(e) => e.into(),
            GatherError::Storage(e) => e.into(),
            GatherError::Json(e) => CrateError::Json(e),
            _ => CrateError::Gather(err.to_string()),
        }
    }
}
