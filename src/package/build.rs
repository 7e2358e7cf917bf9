//! Writing a crate to disk

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, instrument};

use crate::collection::Collection;
use crate::config::PipelineOptions;
use crate::http::Fetcher;
use crate::package::assemble::{METADATA_FILE, assemble_package};
use crate::package::error::PackageError;
use crate::package::layout::{CrateLayout, DEFAULT_ANCILLARY_DIR, PackageParts};
use crate::package::metadata::UserMetadata;
use crate::storage::Filesystem;

/// Directory crates are written into when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Where a crate is written
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Parent directory of the crate directory
    pub output_root: PathBuf,

    /// Name of the ancillary directory inside the crate
    pub ancillary_dir: String,

    /// Unix timestamp in the crate directory name, now when unset
    pub timestamp: Option<i64>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ancillary_dir: DEFAULT_ANCILLARY_DIR.to_string(),
            timestamp: None,
        }
    }
}

impl PackageOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    pub fn with_ancillary_dir(mut self, ancillary_dir: impl Into<String>) -> Self {
        self.ancillary_dir = ancillary_dir.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// What a build wrote
#[derive(Debug, Clone)]
pub struct PackageSummary {
    pub layout: CrateLayout,
    pub metadata_path: PathBuf,
    pub parts: PackageParts,
    /// Media files and posters actually downloaded
    pub downloaded: usize,
}

/// Build a crate for `collection` under `options.output_root`
///
/// Creates the directory layout, writes one record file per item, downloads
/// every media file and poster, and writes `ro-crate-metadata.json`. Under
/// dry-run nothing is downloaded but the media and poster files are still
/// listed in `hasPart`. A failed download aborts the build.
#[instrument(skip_all, fields(name = %metadata.name, items = collection.items().len()))]
pub async fn build_package<F: Fetcher, S: Filesystem>(
    fetcher: &F,
    storage: &S,
    collection: &Collection,
    metadata: &UserMetadata,
    options: &PackageOptions,
    pipeline: PipelineOptions,
    progress: Option<&ProgressBar>,
) -> Result<PackageSummary, PackageError> {
    let timestamp = options
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp());
    let layout = CrateLayout::new(
        &options.output_root,
        &metadata.name,
        timestamp,
        &options.ancillary_dir,
    );
    info!("Creating crate in {}", layout.root.display());

    for dir in layout.directories() {
        storage.create_dir_all(dir).await?;
    }

    for item in collection.items() {
        if item.file.is_empty() {
            return Err(PackageError::InvalidRecord(format!(
                "item '{}' has no file name",
                item.label
            )));
        }
        let path = layout.records.join(&item.file);
        storage
            .write(&path, format!("{}\n", item.source).as_bytes())
            .await?;
    }

    let parts = PackageParts::from_collection(collection);
    let mut downloaded = 0;
    if pipeline.dry_run {
        info!(
            "Dry run, skipping {} media files and {} posters",
            collection.media_urls().len(),
            collection.poster_urls().len()
        );
    } else {
        downloaded +=
            download_all(fetcher, storage, collection.media_urls(), &parts.media, &layout.root, progress)
                .await?;
        downloaded += download_all(
            fetcher,
            storage,
            collection.poster_urls(),
            &parts.posters,
            &layout.root,
            progress,
        )
        .await?;
    }

    let document = assemble_package(metadata, &parts);
    let metadata_path = layout.root.join(METADATA_FILE);
    storage
        .write(&metadata_path, document.to_json()?.as_bytes())
        .await?;
    info!("Metadata written to {}", metadata_path.display());

    Ok(PackageSummary {
        layout,
        metadata_path,
        parts,
        downloaded,
    })
}

// `parts` holds the crate relative path of each URL, in URL order
async fn download_all<F: Fetcher, S: Filesystem>(
    fetcher: &F,
    storage: &S,
    urls: &[String],
    parts: &[String],
    root: &Path,
    progress: Option<&ProgressBar>,
) -> Result<usize, PackageError> {
    for (url, part) in urls.iter().zip(parts) {
        let path = root.join(part);
        debug!("Downloading {} to {}", url, path.display());

        let content = fetcher.fetch(url).await?;
        storage.write(&path, &content).await?;

        if let Some(progress) = progress {
            progress.inc(1);
            progress.set_message(part.clone());
        }
    }
    Ok(urls.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{Item, Media, Poster};
    use crate::http::testing::StaticFetcher;
    use crate::storage::LocalFilesystem;
    use serde_json::Value;
    use tempfile::tempdir;

    const POSTER_URL: &str = "https://media/hsm/c02.jpg$$poster/master";
    const MEDIA_URL: &str = "https://media/hsm/c02.mp3/master";

    fn collection() -> Collection {
        Collection::new(vec![
            Item {
                label: "C02 Beata progenies".to_string(),
                file: "c02.json".to_string(),
                poster: Poster {
                    name: "c02".to_string(),
                    url: POSTER_URL.to_string(),
                },
                media: vec![Media {
                    name: "c02.mp3".to_string(),
                    mime_type: "audio/mpeg".to_string(),
                    url: MEDIA_URL.to_string(),
                }],
                source: "{\"base\": {}}".to_string(),
                ..Item::default()
            },
            Item {
                label: "M001".to_string(),
                file: "m001.json".to_string(),
                poster: Poster {
                    name: "c02".to_string(),
                    url: POSTER_URL.to_string(),
                },
                source: "{}".to_string(),
                ..Item::default()
            },
        ])
    }

    fn metadata() -> UserMetadata {
        UserMetadata {
            name: "Motet Cycles".to_string(),
            publisher: "https://ror.org/02s6k3f65".to_string(),
            ..UserMetadata::default()
        }
    }

    #[tokio::test]
    async fn test_build_package() {
        let temp_dir = tempdir().unwrap();
        let fetcher = StaticFetcher::new()
            .with(MEDIA_URL, "audio")
            .with(POSTER_URL, "image");
        let options = PackageOptions::new(temp_dir.path()).with_timestamp(1714521600);

        let summary = build_package(
            &fetcher,
            &LocalFilesystem::new(),
            &collection(),
            &metadata(),
            &options,
            PipelineOptions::default(),
            None,
        )
        .await
        .unwrap();

        let root = temp_dir.path().join("ro-crate-Motet-Cycles-1714521600");
        assert_eq!(summary.layout.root, root);
        assert_eq!(summary.downloaded, 2);
        assert!(root.join("ancillary").is_dir());
        assert_eq!(
            std::fs::read_to_string(root.join("records/c02.json")).unwrap(),
            "{\"base\": {}}\n"
        );
        assert_eq!(std::fs::read(root.join("media/c02.mp3")).unwrap(), b"audio");
        assert_eq!(std::fs::read(root.join("posters/c02.jpg")).unwrap(), b"image");

        let document: Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.metadata_path).unwrap()).unwrap();
        let has_part = document["@graph"][1]["hasPart"].as_array().unwrap();
        assert_eq!(has_part.len(), 4);
        assert_eq!(has_part[2]["@id"], "media/c02.mp3");
        assert_eq!(has_part[3]["@id"], "posters/c02.jpg");
    }

    #[tokio::test]
    async fn test_dry_run_lists_downloads_without_fetching() {
        let temp_dir = tempdir().unwrap();
        let fetcher = StaticFetcher::new();
        let options = PackageOptions::new(temp_dir.path())
            .with_ancillary_dir("extras")
            .with_timestamp(1);

        let summary = build_package(
            &fetcher,
            &LocalFilesystem::new(),
            &collection(),
            &metadata(),
            &options,
            PipelineOptions::new(true, false),
            None,
        )
        .await
        .unwrap();

        assert!(fetcher.requests().is_empty());
        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.parts.len(), 4);
        assert!(summary.layout.root.join("extras").is_dir());
        assert!(summary.layout.root.join("records/m001.json").exists());
        assert!(!summary.layout.root.join("media/c02.mp3").exists());
        assert!(summary.metadata_path.exists());
    }

    #[tokio::test]
    async fn test_failed_download_aborts() {
        let temp_dir = tempdir().unwrap();
        let fetcher = StaticFetcher::new().with(MEDIA_URL, "audio");
        let options = PackageOptions::new(temp_dir.path()).with_timestamp(1);

        let result = build_package(
            &fetcher,
            &LocalFilesystem::new(),
            &collection(),
            &metadata(),
            &options,
            PipelineOptions::default(),
            None,
        )
        .await;

        assert!(matches!(result, Err(PackageError::Fetch(_))));
        assert!(
            !temp_dir
                .path()
                .join("ro-crate-Motet-Cycles-1")
                .join(METADATA_FILE)
                .exists()
        );
    }

    #[tokio::test]
    async fn test_colliding_file_names_are_kept_apart() {
        let temp_dir = tempdir().unwrap();
        let first = "https://media/hsm/a/scan.tif/master";
        let second = "https://media/hsm/b/scan.tif/master";
        let bare = "https://media/hsm/";
        let collection = Collection::new(vec![Item {
            label: "C03".to_string(),
            file: "c03.json".to_string(),
            media: [first, second, bare]
                .iter()
                .map(|url| Media {
                    name: "scan".to_string(),
                    mime_type: "image/tiff".to_string(),
                    url: url.to_string(),
                })
                .collect(),
            source: "{}".to_string(),
            ..Item::default()
        }]);
        let fetcher = StaticFetcher::new()
            .with(first, "first")
            .with(second, "second")
            .with(bare, "bare");

        let summary = build_package(
            &fetcher,
            &LocalFilesystem::new(),
            &collection,
            &metadata(),
            &PackageOptions::new(temp_dir.path()).with_timestamp(1),
            PipelineOptions::default(),
            None,
        )
        .await
        .unwrap();

        let media = summary.layout.media;
        assert_eq!(summary.downloaded, 3);
        assert_eq!(std::fs::read(media.join("scan.tif")).unwrap(), b"first");
        assert_eq!(std::fs::read(media.join("scan-2.tif")).unwrap(), b"second");
        assert_eq!(std::fs::read(media.join("unnamed")).unwrap(), b"bare");
        assert_eq!(
            summary.parts.media,
            ["media/scan.tif", "media/scan-2.tif", "media/unnamed"]
        );
    }

    #[tokio::test]
    async fn test_item_without_file_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let collection = Collection::new(vec![Item {
            label: "untitled".to_string(),
            ..Item::default()
        }]);

        let result = build_package(
            &StaticFetcher::new(),
            &LocalFilesystem::new(),
            &collection,
            &metadata(),
            &PackageOptions::new(temp_dir.path()),
            PipelineOptions::default(),
            None,
        )
        .await;

        assert!(matches!(result, Err(PackageError::InvalidRecord(_))));
    }
}
