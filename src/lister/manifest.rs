//! Listing manifest (JSON Lines) and checklist output

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::lister::error::ListError;
use crate::lister::RawRecord;
use crate::storage::Filesystem;

/// Serialize records as one compact JSON object per line
pub fn to_json_lines(records: &[RawRecord]) -> Result<String, ListError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Read a listing manifest; blank lines are skipped
pub fn read_manifest(text: &str) -> Result<Vec<RawRecord>, ListError> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(ListError::from))
        .collect()
}

/// Checklist mapping each row index to its title and URL
pub fn checklist(records: &[RawRecord]) -> Result<String, ListError> {
    let entries: BTreeMap<usize, String> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (index, format!("[{}, {}]\n", record.title, record.url)))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Write `<output>.manifest` and, if requested, `<output>.checklist`
///
/// Returns the paths written.
pub async fn write_listing<S: Filesystem>(
    storage: &S,
    records: &[RawRecord],
    output: &Path,
    with_checklist: bool,
) -> Result<Vec<PathBuf>, ListError> {
    let mut written = Vec::new();

    let manifest_path = with_suffix(output, "manifest");
    storage
        .write(&manifest_path, to_json_lines(records)?.as_bytes())
        .await?;
    info!("Manifest written to {}", manifest_path.display());
    written.push(manifest_path);

    if with_checklist {
        let checklist_path = with_suffix(output, "checklist");
        storage
            .write(&checklist_path, checklist(records)?.as_bytes())
            .await?;
        info!("Checklist written to {}", checklist_path.display());
        written.push(checklist_path);
    }

    Ok(written)
}

/// `<output>.<suffix>`, appended rather than replacing any extension
pub(crate) fn with_suffix(output: &Path, suffix: &str) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalFilesystem;
    use tempfile::tempdir;

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord {
                url: "https://ink.sammlung.cc/detail/motetcycle-0445/".to_string(),
                signature: "motetcycle-0445".to_string(),
                thumbnail_url: String::new(),
                title: "C55 Gaude flore virginali".to_string(),
                detail_url: "https://ink.sammlung.cc/detail-data/motetcycle-0445/de?".to_string(),
            },
            RawRecord {
                title: "C12a Ave mundi domina".to_string(),
                ..RawRecord::default()
            },
        ]
    }

    #[test]
    fn test_json_lines_read_back() {
        let text = to_json_lines(&records()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("{\"url\":"));
        assert!(text.contains("\"dataUrl\":\"https://ink.sammlung.cc/detail-data/motetcycle-0445/de?\""));

        let read = read_manifest(&format!("{}\n\n", text)).unwrap();
        assert_eq!(read, records());
    }

    #[test]
    fn test_read_manifest_rejects_garbage() {
        assert!(matches!(
            read_manifest("{\"url\": \"a\"}\nnot json\n"),
            Err(ListError::Manifest(_))
        ));
    }

    #[test]
    fn test_checklist() {
        let text = checklist(&records()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value["0"],
            "[C55 Gaude flore virginali, https://ink.sammlung.cc/detail/motetcycle-0445/]\n"
        );
        assert_eq!(value["1"], "[C12a Ave mundi domina, ]\n");
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("out/motets"), "manifest"),
            PathBuf::from("out/motets.manifest")
        );
        assert_eq!(
            with_suffix(Path::new("motets.v1"), "checklist"),
            PathBuf::from("motets.v1.checklist")
        );
    }

    #[tokio::test]
    async fn test_write_listing() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("motets");

        let written = write_listing(&LocalFilesystem::new(), &records(), &output, true)
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        let manifest = std::fs::read_to_string(temp_dir.path().join("motets.manifest")).unwrap();
        assert_eq!(read_manifest(&manifest).unwrap().len(), 2);
        assert!(temp_dir.path().join("motets.checklist").exists());
    }
}
