//! Directory layout of a crate and the relative paths of its parts

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::collection::Collection;

pub const RECORDS_DIR: &str = "records";
pub const MEDIA_DIR: &str = "media";
pub const POSTERS_DIR: &str = "posters";

/// Ancillary directory name when none is given
pub const DEFAULT_ANCILLARY_DIR: &str = "ancillary";

/// Stand-in for URLs without a usable last segment
const UNNAMED_FILE: &str = "unnamed";

/// Name of the crate directory for a dataset name and unix timestamp
pub fn crate_dir_name(name: &str, timestamp: i64) -> String {
    format!("ro-crate-{}-{}", name.replace(' ', "-"), timestamp)
}

/// File name a downloaded media file or poster is stored under
///
/// Media server suffixes are removed before taking the last path segment.
pub fn make_filename(url: &str) -> String {
    let url = url.replacen("$$poster/master", "", 1);
    let url = url.replacen("/master", "", 1);
    url.rsplit('/').next().unwrap_or_default().to_string()
}

/// Directories of one crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateLayout {
    pub root: PathBuf,
    pub records: PathBuf,
    pub media: PathBuf,
    pub posters: PathBuf,
    pub ancillary: PathBuf,
}

impl CrateLayout {
    pub fn new(output_root: &Path, name: &str, timestamp: i64, ancillary_dir: &str) -> Self {
        let root = output_root.join(crate_dir_name(name, timestamp));
        Self {
            records: root.join(RECORDS_DIR),
            media: root.join(MEDIA_DIR),
            posters: root.join(POSTERS_DIR),
            ancillary: root.join(ancillary_dir),
            root,
        }
    }

    /// Every directory to create, root first
    pub fn directories(&self) -> [&Path; 5] {
        [
            self.root.as_path(),
            self.records.as_path(),
            self.media.as_path(),
            self.posters.as_path(),
            self.ancillary.as_path(),
        ]
    }
}

/// Paths of the crate's files, relative to the crate root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageParts {
    pub records: Vec<String>,
    pub media: Vec<String>,
    pub posters: Vec<String>,
}

impl PackageParts {
    /// One record per item, one media file and poster per distinct URL
    pub fn from_collection(collection: &Collection) -> Self {
        Self {
            records: collection
                .items()
                .iter()
                .map(|item| format!("{}/{}", RECORDS_DIR, item.file))
                .collect(),
            media: download_parts(MEDIA_DIR, collection.media_urls()),
            posters: download_parts(POSTERS_DIR, collection.poster_urls()),
        }
    }

    /// Records, then media, then posters
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .chain(&self.media)
            .chain(&self.posters)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len() + self.media.len() + self.posters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distinct file names for a list of download URLs, in URL order
///
/// A URL without a last segment is stored as `unnamed`. A name already taken
/// gets a numeric suffix before its extension (`scan.tif`, `scan-2.tif`).
pub fn download_file_names(urls: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();
    urls.iter()
        .map(|url| {
            let mut name = make_filename(url);
            if name.is_empty() || name == "." || name == ".." {
                warn!("No file name in {}, storing as {}", url, UNNAMED_FILE);
                name = UNNAMED_FILE.to_string();
            }
            if taken.contains(&name) {
                let renamed = next_free_name(&name, &taken);
                warn!("File name {} already used, storing {} as {}", name, url, renamed);
                name = renamed;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

fn next_free_name(name: &str, taken: &HashSet<String>) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, format!(".{}", extension)),
        _ => (name, String::new()),
    };
    (2..)
        .map(|n| format!("{}-{}{}", stem, n, extension))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

fn download_parts(dir: &str, urls: &[String]) -> Vec<String> {
    download_file_names(urls)
        .into_iter()
        .map(|name| format!("{}/{}", dir, name))
        .collect()
}
