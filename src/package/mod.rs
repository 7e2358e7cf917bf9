//! # Packaging Module
//!
//! Last stage of the harvest. Turns a collection manifest and user supplied
//! metadata into an RO-Crate 1.1 directory, and validates crates once they
//! are written.
//!
//! ## Key Components
//!
//! - `assemble_package`: the JSON-LD document for a set of crate files
//! - `build_package`: directory layout, record files, downloads, metadata
//! - `validate_package`: structural checks and `hasPart` existence checks

pub mod assemble;
pub mod build;
mod error;
pub mod layout;
pub mod metadata;
pub mod validate;

pub use assemble::{CrateDocument, GraphNode, METADATA_FILE, assemble_package};
pub use build::{PackageOptions, PackageSummary, build_package};
pub use error::PackageError;
pub use layout::{CrateLayout, PackageParts, download_file_names, make_filename};
pub use metadata::{UserMetadata, split_keywords};
pub use validate::{ValidationIssue, ValidationReport, validate_package};

use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

use crate::collection::Collection;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PackageError> {
    debug!("Reading {}", path.display());
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| PackageError::Read {
            path: path.display().to_string(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| PackageError::InvalidJson {
        path: path.display().to_string(),
        source,
    })
}

/// Read a collection manifest written by `gather`
pub async fn read_collection(path: &Path) -> Result<Collection, PackageError> {
    read_json(path).await
}

/// Read the user metadata document
pub async fn read_metadata(path: &Path) -> Result<UserMetadata, PackageError> {
    read_json(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_collection_rederives_urls() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("motets.collection");
        std::fs::write(
            &path,
            r#"{
                "records": [{"label": "C02", "file": "c02.json", "poster": {"name": "p", "url": "P"}}],
                "media_urls": ["stale"],
                "poster_urls": []
            }"#,
        )
        .unwrap();

        let collection = read_collection(&path).await.unwrap();
        assert_eq!(collection.items()[0].file, "c02.json");
        assert_eq!(collection.poster_urls(), ["P"]);
        assert!(collection.media_urls().is_empty());
    }

    #[tokio::test]
    async fn test_read_metadata_errors() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("meta.json");

        assert!(matches!(
            read_metadata(&path).await,
            Err(PackageError::Read { .. })
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_metadata(&path).await,
            Err(PackageError::InvalidJson { .. })
        ));

        std::fs::write(&path, r#"{"name": "Motet Cycles", "keywords": "a,b"}"#).unwrap();
        let metadata = read_metadata(&path).await.unwrap();
        assert_eq!(metadata.keyword_list(), ["a", "b"]);
    }
}
