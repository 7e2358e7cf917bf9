//! Structural checks on a written crate

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::package::assemble::{METADATA_FILE, ROOT_ID};
use crate::package::error::PackageError;

/// A problem found in a crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingContext,
    MissingGraph,
    MissingDescriptor,
    MissingConformsTo,
    MissingAbout,
    MissingRootDataset,
    /// A `hasPart` entry without an `@id`
    InvalidPart(usize),
    /// A `hasPart` entry with no file behind it
    MissingFile(PathBuf),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContext => write!(f, "@context is missing"),
            Self::MissingGraph => write!(f, "@graph is missing or not a list"),
            Self::MissingDescriptor => write!(f, "no {} descriptor node", METADATA_FILE),
            Self::MissingConformsTo => write!(f, "descriptor node has no conformsTo"),
            Self::MissingAbout => write!(f, "descriptor node has no about"),
            Self::MissingRootDataset => write!(f, "no root dataset node with @id {}", ROOT_ID),
            Self::InvalidPart(index) => write!(f, "hasPart entry {} has no @id", index),
            Self::MissingFile(path) => write!(f, "item does not exist: {}", path.display()),
        }
    }
}

/// Outcome of validating one crate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// `hasPart` entries checked on disk
    pub checked_parts: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Split a crate path into the crate root and its metadata file
///
/// Accepts either the crate directory or the metadata file itself.
pub fn crate_paths(path: &Path) -> (PathBuf, PathBuf) {
    if path.file_name().is_some_and(|name| name == METADATA_FILE) {
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        (root, path.to_path_buf())
    } else {
        (path.to_path_buf(), path.join(METADATA_FILE))
    }
}

/// Validate the crate at `path`
///
/// With `check_paths`, every `hasPart` entry of the root dataset must exist
/// relative to the crate root. An unreadable or unparseable metadata file is
/// an error rather than an issue.
#[instrument]
pub async fn validate_package(path: &Path, check_paths: bool) -> Result<ValidationReport, PackageError> {
    let (root, metadata_path) = crate_paths(path);
    let text = fs::read_to_string(&metadata_path)
        .await
        .map_err(|source| PackageError::Read {
            path: metadata_path.display().to_string(),
            source,
        })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| PackageError::InvalidJson {
        path: metadata_path.display().to_string(),
        source,
    })?;

    let mut report = check_document(&document);

    if check_paths {
        for (index, part) in has_part(&document).iter().enumerate() {
            let Some(id) = part.get("@id").and_then(Value::as_str) else {
                report.issues.push(ValidationIssue::InvalidPart(index));
                continue;
            };
            let file = root.join(id);
            debug!("Checking {}", file.display());
            if !fs::try_exists(&file).await.unwrap_or(false) {
                report.issues.push(ValidationIssue::MissingFile(file));
            }
            report.checked_parts += 1;
        }
    }

    for issue in &report.issues {
        warn!("{}", issue);
    }
    info!(
        "Validated {}: {} issues, {} files checked",
        metadata_path.display(),
        report.issues.len(),
        report.checked_parts
    );
    Ok(report)
}

/// Structural checks that need no filesystem access
pub fn check_document(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    if document.get("@context").is_none_or(Value::is_null) {
        report.issues.push(ValidationIssue::MissingContext);
    }

    let Some(graph) = document.get("@graph").and_then(Value::as_array) else {
        report.issues.push(ValidationIssue::MissingGraph);
        return report;
    };

    match find_node(graph, METADATA_FILE) {
        Some(descriptor) => {
            if descriptor.get("conformsTo").and_then(|c| c.get("@id")).is_none() {
                report.issues.push(ValidationIssue::MissingConformsTo);
            }
            if descriptor.get("about").and_then(|a| a.get("@id")).is_none() {
                report.issues.push(ValidationIssue::MissingAbout);
            }
        }
        None => report.issues.push(ValidationIssue::MissingDescriptor),
    }

    if find_node(graph, ROOT_ID).is_none() {
        report.issues.push(ValidationIssue::MissingRootDataset);
    }

    report
}

fn find_node<'a>(graph: &'a [Value], id: &str) -> Option<&'a Value> {
    graph
        .iter()
        .find(|node| node.get("@id").and_then(Value::as_str) == Some(id))
}

fn has_part(document: &Value) -> Vec<Value> {
    document
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|graph| find_node(graph, ROOT_ID))
        .and_then(|dataset| dataset.get("hasPart"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
