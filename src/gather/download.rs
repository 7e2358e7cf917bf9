//! Sequential download of detail data for listed records

use std::path::{Component, Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineOptions;
use crate::gather::GatherOptions;
use crate::gather::error::GatherError;
use crate::http::Fetcher;
use crate::lister::RawRecord;
use crate::storage::Filesystem;

/// Pretty-print JSON detail data; anything else is returned unchanged
pub fn pretty_json(content: &[u8]) -> Vec<u8> {
    match serde_json::from_slice::<serde_json::Value>(content)
        .and_then(|value| serde_json::to_vec_pretty(&value))
    {
        Ok(pretty) => pretty,
        Err(e) => {
            warn!("Detail data is not JSON, storing as received: {}", e);
            content.to_vec()
        }
    }
}

/// Whether a signature can name a file directly inside the data directory
///
/// It must be a single plain path segment: no separators, no `.` or `..`,
/// nothing absolute.
pub fn is_safe_signature(signature: &str) -> bool {
    if signature.is_empty() || signature.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(signature).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Download every record's detail data into `<data_dir>/<signature>.json`
///
/// Records are fetched one at a time with a fixed pause between requests.
/// Any failed fetch or write aborts the run. Records without a detail URL,
/// and records whose signature is not a plain file name, are skipped.
/// Returns the files written.
#[instrument(skip_all, fields(records = records.len()))]
pub async fn download_records<F: Fetcher, S: Filesystem>(
    fetcher: &F,
    storage: &S,
    records: &[RawRecord],
    options: &GatherOptions,
    pipeline: PipelineOptions,
    progress: Option<&ProgressBar>,
) -> Result<Vec<PathBuf>, GatherError> {
    storage.create_dir_all(&options.data_dir).await?;

    let mut written = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.detail_url.is_empty() || record.signature.is_empty() {
            warn!("Skipping record without detail URL or signature: {}", record);
            continue;
        }
        if !is_safe_signature(&record.signature) {
            warn!(
                "Skipping record with unusable signature {:?}: {}",
                record.signature, record
            );
            continue;
        }

        if index > 0 && !options.pause.is_zero() {
            tokio::time::sleep(options.pause).await;
        }

        if pipeline.verbose {
            info!("Downloading {}", record.detail_url);
        } else {
            debug!("Downloading {}", record.detail_url);
        }
        let content = fetcher.fetch(&record.detail_url).await?;

        let path = options.data_dir.join(format!("{}.json", record.signature));
        storage.write(&path, &pretty_json(&content)).await?;
        written.push(path);

        if let Some(progress) = progress {
            progress.inc(1);
            progress.set_message(record.signature.clone());
        }
    }

    info!("Downloaded {} detail records", written.len());
    Ok(written)
}
