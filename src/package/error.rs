//! Error types for the package module

use crate::error::Error as CrateError;
use crate::http::FetchError;
use crate::storage::StorageError;
use thiserror::Error;

/// Error type for RO-Crate packaging and validation
#[derive(Debug, Error)]
pub enum PackageError {
    /// Downloading a media file or poster failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Writing into the crate failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A manifest, metadata or crate document could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A manifest, metadata or crate document is not valid JSON
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record cannot be placed in the crate
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PackageError> for CrateError {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::Fetch(e) => e.into(),
            PackageError::Storage(e) => e.into(),
            PackageError::Json(e) => CrateError::Json(e),
            _ => CrateError::Package(err.to_string()),
        }
    }
}
