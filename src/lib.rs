//! # inkcrate - INK Mediathek harvester and RO-Crate packager
//!
//! This crate harvests catalog records from the INK Mediathek and packages
//! them, together with their media files and posters, as an RO-Crate 1.1
//! directory ready for archival deposit.
//!
//! ## Pipeline
//!
//! - [`lister`]: request the catalog's results table and extract one
//!   [`lister::RawRecord`] per row
//! - [`gather`]: download each record's detail data and flatten it into a
//!   [`collection::Collection`]
//! - [`package`]: write the crate directory and its JSON-LD metadata, and
//!   validate written crates
//!
//! Network and filesystem access go through the [`http::Fetcher`] and
//! [`storage::Filesystem`] traits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use inkcrate::config::{PipelineOptions, user_agent};
//! use inkcrate::http::HttpFetcher;
//! use inkcrate::lister::{ListerConfig, SearchQuery, list_records};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpFetcher::new(&user_agent())?;
//!     let config = ListerConfig::builder().language("en").results(25).build();
//!     let query = SearchQuery::Text("motetcycle".to_string());
//!
//!     for record in list_records(&fetcher, &config, &query, PipelineOptions::default()).await? {
//!         println!("{}", record);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
mod error;
pub mod gather;
pub mod http;
pub mod lister;
pub mod package;
pub mod storage;

pub use error::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::collection::{Collection, Item};
    pub use crate::config::PipelineOptions;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::http::{Fetcher, HttpFetcher};
    pub use crate::storage::{Filesystem, LocalFilesystem};
}
