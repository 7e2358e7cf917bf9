//! Detail data as served by the catalog for each record

use serde::{Deserialize, Serialize};

/// Language tagged title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Title {
    pub lang: String,
    pub value: String,
}

/// Core metadata of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Base {
    /// Titles of the record; the first is canonical
    pub title: Vec<Title>,

    /// Signature / slug of the record
    pub signature: String,

    pub license: String,

    pub publisher: String,

    /// Preview image of the record
    pub poster: PosterRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterRef {
    pub name: String,
    pub uri: String,
}

/// Another catalog record this one relates to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub signature: String,
    pub title: Vec<Title>,
    pub url: String,
    pub poster: PosterRef,
    pub license: String,
    pub media: MediaGroup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaItem {
    pub name: String,
    pub uri: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
}

/// Media of one type attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaGroup {
    #[serde(rename = "type")]
    pub media_type: String,
    pub items: Vec<MediaItem>,
}

/// Extra key/value metadata, usually persistent identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extra {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub text: String,
    pub title: String,
}

/// One catalog record's detail data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailRecord {
    pub base: Base,

    /// Name of the data file the record was read from
    pub file_name: String,

    pub media: Vec<MediaGroup>,

    #[serde(rename = "referencesFull")]
    pub references: Vec<Reference>,

    pub extra: Vec<Extra>,

    /// Notes, including the record's description
    pub notes: Vec<Note>,

    /// Raw detail data the record was parsed from
    pub source: String,
}

impl DetailRecord {
    /// Parse detail data, keeping the raw text as the record's source
    pub fn from_json(file_name: &str, text: &str) -> Result<Self, serde_json::Error> {
        let mut record: DetailRecord = serde_json::from_str(text)?;
        record.file_name = file_name.to_string();
        record.source = text.to_string();
        Ok(record)
    }
}
