//! # Catalog Lister Module
//!
//! First stage of the harvest: request the catalog's results table and turn
//! each row into a [`RawRecord`] pointing at the record's detail data.
//!
//! ## Key Components
//!
//! - `ListerConfig`: language, column layout and endpoint of the results table
//! - `SearchQuery` / `search_url`: results-table URL for a search or collection
//! - `walk_document` / `extract_table`: positional extraction of table rows
//! - `write_listing` / `read_manifest`: JSON Lines manifest consumed by `gather`

pub mod config;
mod error;
pub mod manifest;
pub mod search;
pub mod table;

pub use config::{Column, ColumnLayout, ListerConfig};
pub use error::ListError;
pub use manifest::{read_manifest, write_listing};
pub use search::{SearchQuery, search_url};
pub use table::{extract_table, walk_document};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::PipelineOptions;
use crate::http::Fetcher;

/// One row of the catalog's results table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// URL of the catalog record
    pub url: String,

    /// Signature / slug of the record
    pub signature: String,

    /// Thumbnail image of the record
    #[serde(rename = "img")]
    pub thumbnail_url: String,

    /// Title of the record
    pub title: String,

    /// Detail data associated with the record, served as JSON
    #[serde(rename = "dataUrl")]
    pub detail_url: String,
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "title: {} | url: {}", self.title, self.url)
    }
}

/// Fetch the results table for a query and extract its records
///
/// With `verbose` every listed record is logged at info level.
#[instrument(skip(fetcher, config))]
pub async fn list_records<F: Fetcher>(
    fetcher: &F,
    config: &ListerConfig,
    query: &SearchQuery,
    pipeline: PipelineOptions,
) -> Result<Vec<RawRecord>, ListError> {
    let url = search_url(&config.table_url, &config.language, query, config.results);
    info!("Requesting {}", url);

    let html = fetcher.fetch(&url).await?;
    let records = extract_table(&html, config)?;
    for record in &records {
        if pipeline.verbose {
            info!("Listed {}", record);
        } else {
            debug!("Listed {}", record);
        }
    }

    info!("Listed {} records", records.len());
    Ok(records)
}
