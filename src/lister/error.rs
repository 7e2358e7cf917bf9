//! Error types for the lister module

use crate::error::Error as CrateError;
use crate::http::FetchError;
use crate::storage::StorageError;
use thiserror::Error;

/// Error type for catalog listing operations
#[derive(Debug, Error)]
pub enum ListError {
    /// Fetching the results table failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The results document could not be read as HTML
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// Neither a search term nor a collection was given
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A listing manifest line could not be read or written
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Writing the manifest failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ListError> for CrateError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Fetch(e) => e.into(),
            ListError::Manifest(e) => CrateError::Json(e),
            ListError::Storage(e) => e.into(),
            _ => CrateError::List(err.to_string()),
        }
    }
}
