//! Loading downloaded detail data from the data directory

use std::path::Path;

use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::gather::error::GatherError;
use crate::gather::record::DetailRecord;

/// Extension of detail data files
const DATA_EXTENSION: &str = "json";

/// Read every detail data file in `data_dir`, in file name order
///
/// Hidden files and files without a `.json` extension are ignored. A file
/// that cannot be read or parsed is reported and skipped; an unreadable
/// directory fails the load.
#[instrument]
pub async fn load_records(data_dir: &Path) -> Result<Vec<DetailRecord>, GatherError> {
    let dir_error = |source| GatherError::DataDir {
        path: data_dir.display().to_string(),
        source,
    };

    let mut entries = fs::read_dir(data_dir).await.map_err(dir_error)?;
    let mut file_names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if file_name.starts_with('.') || !file_name.ends_with(DATA_EXTENSION) {
            debug!("Ignoring {}", file_name);
            continue;
        }
        file_names.push(file_name);
    }
    file_names.sort();
    info!("Detail files in data directory: {}", file_names.len());

    let mut records = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        let path = data_dir.join(&file_name);
        debug!("Processing {}", path.display());

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        match DetailRecord::from_json(&file_name, &text) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Cannot parse {}: {}", path.display(), e),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_records() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(
            dir.join("m001.json"),
            r#"{"base": {"title": [{"lang": "en", "value": "M001 Beata progenies"}]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("c02.json"),
            r#"{"base": {"title": [{"lang": "en", "value": "C02 Beata progenies"}]}}"#,
        )
        .unwrap();
        std::fs::write(dir.join(".hidden.json"), "{}").unwrap();
        std::fs::write(dir.join("notes.txt"), "{}").unwrap();
        std::fs::write(dir.join("broken.json"), "{").unwrap();

        let records = load_records(dir).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_name, "c02.json");
        assert_eq!(records[0].base.title[0].value, "C02 Beata progenies");
        assert_eq!(records[1].file_name, "m001.json");
        assert!(records[1].source.contains("M001 Beata progenies"));
    }

    #[tokio::test]
    async fn test_missing_data_dir() {
        let temp_dir = tempdir().unwrap();
        let result = load_records(&temp_dir.path().join("data")).await;
        assert!(matches!(result, Err(GatherError::DataDir { .. })));
    }
}
