//! # Detail Gathering Module
//!
//! Second stage of the harvest. Downloads the detail data of every listed
//! record, reads the downloaded files back, and flattens them into a
//! [`Collection`] ready for packaging.
//!
//! ## Key Components
//!
//! - `download_records`: sequential, paused download into the data directory
//! - `load_records`: read `DetailRecord`s from the data directory
//! - `make_collection`: map records onto items and derive the URL lists
//! - `write_collection`: collection manifest consumed by `package`

mod convert;
mod download;
mod error;
mod load;
pub mod mapper;
pub mod record;

pub use convert::{IdentifierKind, media_server_url};
pub use download::{download_records, is_safe_signature, pretty_json};
pub use error::GatherError;
pub use load::load_records;
pub use mapper::{Diagnostic, ItemOutcome, MappingError, Normalized, make_collection, map_record};
pub use record::DetailRecord;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::collection::Collection;
use crate::lister::manifest::with_suffix;
use crate::storage::Filesystem;

/// Directory detail data is downloaded into when none is given
pub const DEFAULT_DATA_DIR: &str = "data";

/// Pause between detail requests when none is given
pub const DEFAULT_PAUSE_MS: u64 = 1000;

/// Where and how detail data is gathered
#[derive(Debug, Clone)]
pub struct GatherOptions {
    /// Directory holding one JSON file per record
    pub data_dir: PathBuf,

    /// Pause between consecutive detail requests
    pub pause: Duration,
}

impl Default for GatherOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pause: Duration::from_millis(DEFAULT_PAUSE_MS),
        }
    }
}

/// Serialize a collection manifest
pub fn collection_json(collection: &Collection) -> Result<String, GatherError> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Write the collection manifest to `<output>.collection`
pub async fn write_collection<S: Filesystem>(
    storage: &S,
    collection: &Collection,
    output: &Path,
) -> Result<PathBuf, GatherError> {
    let path = with_suffix(output, "collection");
    let json = collection_json(collection)?;
    storage.write(&path, format!("{}\n", json).as_bytes()).await?;
    info!("Collection written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Item;
    use crate::storage::LocalFilesystem;
    use tempfile::tempdir;

    #[test]
    fn test_default_options() {
        let options = GatherOptions::default();
        assert_eq!(options.data_dir, PathBuf::from("data"));
        assert_eq!(options.pause, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_write_collection_reads_back() {
        let temp_dir = tempdir().unwrap();
        let collection = Collection::new(vec![Item {
            label: "C02".to_string(),
            file: "c02.json".to_string(),
            ..Item::default()
        }]);

        let path = write_collection(&LocalFilesystem::new(), &collection, &temp_dir.path().join("motets"))
            .await
            .unwrap();

        assert_eq!(path, temp_dir.path().join("motets.collection"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.ends_with("}\n"));
        let back: Collection = serde_json::from_str(&text).unwrap();
        assert_eq!(back, collection);
    }
}
