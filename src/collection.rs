//! # Collection Model
//!
//! Flattened catalog items and the deduplicated URL lists derived from them.
//! A [`Collection`] is what `gather` hands to `package`: every item becomes a
//! record file in the crate and every collected URL a download.
//!
//! The URL lists are derived from the items. They are recomputed in full
//! whenever the items change and never patched incrementally.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Flattened catalog item, shaped after the RO-Crate record it becomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// The item title
    pub label: String,

    /// Detail data file the item was built from
    pub file: String,

    /// License belonging to the item
    pub license: String,

    /// Publisher of the item
    pub publisher: String,

    /// Related catalog items
    pub relationships: Vec<Relationship>,

    /// Media files attached to the item
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,

    /// Persistent identifiers of the item
    pub identifiers: Vec<Identifier>,

    /// Preview image of the item
    pub poster: Poster,

    /// Description of the item
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Detail data the item was built from, redistributed in the crate
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub label: String,
    pub url: String,
    pub poster: Poster,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub name: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poster {
    pub name: String,
    pub url: String,
}

/// Items plus the distinct URLs they reference
///
/// Deserializing reads only the records and rederives the URL lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CollectionManifest")]
pub struct Collection {
    #[serde(rename = "records")]
    items: Vec<Item>,
    media_urls: Vec<String>,
    poster_urls: Vec<String>,
    related_urls: Vec<String>,
}

/// Stored form of a collection; any stored URL lists are ignored
#[derive(Deserialize)]
struct CollectionManifest {
    #[serde(default)]
    records: Vec<Item>,
}

impl From<CollectionManifest> for Collection {
    fn from(manifest: CollectionManifest) -> Self {
        Collection::new(manifest.records)
    }
}

impl Collection {
    /// Build a collection and derive its URL lists
    pub fn new(items: Vec<Item>) -> Self {
        let mut collection = Self {
            items,
            ..Self::default()
        };
        collection.collect_urls();
        collection
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Distinct poster URLs of items and their relationships
    pub fn poster_urls(&self) -> &[String] {
        &self.poster_urls
    }

    /// Distinct media URLs
    pub fn media_urls(&self) -> &[String] {
        &self.media_urls
    }

    /// Distinct URLs of related catalog items
    pub fn related_urls(&self) -> &[String] {
        &self.related_urls
    }

    /// Replace the items and rederive every URL list
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.collect_urls();
    }

    /// Append an item and rederive every URL list
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
        self.collect_urls();
    }

    /// Derive the URL lists in one pass over the items
    ///
    /// Per item: its poster, then each relationship's poster and URL, then
    /// each media URL. A URL is kept the first time it is seen in its list.
    fn collect_urls(&mut self) {
        let mut posters = UrlList::default();
        let mut media = UrlList::default();
        let mut related = UrlList::default();

        for item in &self.items {
            posters.push(&item.poster.url);
            for relationship in &item.relationships {
                posters.push(&relationship.poster.url);
                related.push(&relationship.url);
            }
            for entry in &item.media {
                media.push(&entry.url);
            }
        }

        self.poster_urls = posters.into_vec();
        self.media_urls = media.into_vec();
        self.related_urls = related.into_vec();

        info!(
            "related URLs: {}, media URLs: {}, poster URLs: {}",
            self.related_urls.len(),
            self.media_urls.len(),
            self.poster_urls.len()
        );
    }
}

/// Insertion-ordered list of distinct, non-empty URLs
#[derive(Debug, Default)]
struct UrlList {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl UrlList {
    fn push(&mut self, url: &str) {
        if url.is_empty() || self.seen.contains(url) {
            return;
        }
        self.seen.insert(url.to_string());
        self.urls.push(url.to_string());
    }

    fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
