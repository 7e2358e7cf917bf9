//! Filesystem access for the inkcrate pipeline
//!
//! Writes made by the gathering and packaging stages go through the
//! [`Filesystem`] trait. [`LocalFilesystem`] writes to disk with `tokio::fs`.

use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;

use tokio::fs;
use tracing::debug;

use crate::error::Error as CrateError;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<StorageError> for CrateError {
    fn from(err: StorageError) -> Self {
        CrateError::Storage(err.to_string())
    }
}

type Result<T> = std::result::Result<T, StorageError>;

/// Future returned by [`Filesystem`] operations
pub type StorageFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Creates directories and writes files
pub trait Filesystem {
    /// Create a directory and all of its parents
    fn create_dir_all<'a>(&'a self, path: &'a Path) -> StorageFuture<'a>;

    /// Write `contents` to `path`, replacing any existing file
    fn write<'a>(&'a self, path: &'a Path, contents: &'a [u8]) -> StorageFuture<'a>;
}

/// Filesystem backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }

    /// Creates the parent directories of `path`
    async fn ensure_directories(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io(parent, e))?;
            }
        }
        Ok(())
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all<'a>(&'a self, path: &'a Path) -> StorageFuture<'a> {
        Box::pin(async move {
            debug!("Creating directory {}", path.display());
            fs::create_dir_all(path)
                .await
                .map_err(|e| StorageError::io(path, e))
        })
    }

    fn write<'a>(&'a self, path: &'a Path, contents: &'a [u8]) -> StorageFuture<'a> {
        Box::pin(async move {
            Self::ensure_directories(path).await?;
            debug!("Writing {} bytes to {}", contents.len(), path.display());
            fs::write(path, contents)
                .await
                .map_err(|e| StorageError::io(path, e))
        })
    }
}
