//! User supplied descriptive metadata for a crate

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_dataset_type() -> String {
    "Dataset".to_string()
}

/// Descriptive fields of the crate's root dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetadata {
    pub identifier: String,
    pub description: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(alias = "data_published")]
    pub date_published: String,
    pub license: String,
    /// Comma separated keywords
    pub keywords: String,
    /// Identifier of the publishing organization
    pub publisher: String,
    #[serde(rename = "publisherName")]
    pub publisher_name: String,
    /// Canonical URL, when there is one
    pub url: String,
}

impl Default for UserMetadata {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            description: String::new(),
            name: String::new(),
            record_type: default_dataset_type(),
            date_published: String::new(),
            license: String::new(),
            keywords: String::new(),
            publisher: String::new(),
            publisher_name: String::new(),
            url: String::new(),
        }
    }
}

impl UserMetadata {
    /// Keyword list of the dataset
    pub fn keyword_list(&self) -> Vec<String> {
        split_keywords(&self.keywords)
    }
}

impl fmt::Display for UserMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in [
            &self.identifier,
            &self.description,
            &self.name,
            &self.record_type,
            &self.date_published,
            &self.license,
            &self.keywords,
            &self.publisher,
            &self.publisher_name,
            &self.url,
        ] {
            writeln!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Split a comma separated keyword string, trimming each entry
///
/// Empty entries are kept.
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(|keyword| keyword.trim().to_string())
        .collect()
}
