//! RO-Crate JSON-LD document assembly
//!
//! The document is a three node graph: the metadata descriptor, the root
//! dataset pointing at every file in the crate, and the publisher.

use serde::Serialize;

use crate::package::layout::PackageParts;
use crate::package::metadata::UserMetadata;

/// File name of the crate's metadata document
pub const METADATA_FILE: &str = "ro-crate-metadata.json";

/// JSON-LD context of RO-Crate 1.1
pub const ROCRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";

/// Profile the metadata descriptor conforms to
pub const ROCRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.1";

/// `@id` of the root dataset
pub const ROOT_ID: &str = "./";

const CREATIVE_WORK: &str = "CreativeWork";
const ORGANIZATION: &str = "Organization";
const DEFAULT_DATASET_TYPE: &str = "Dataset";

/// Reference to another node or file, `{"@id": ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdRef {
    #[serde(rename = "@id", skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Node describing the metadata file itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorNode {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub node_type: String,
    #[serde(rename = "conformsTo")]
    pub conforms_to: IdRef,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    pub about: IdRef,
}

impl Default for DescriptorNode {
    fn default() -> Self {
        Self {
            id: METADATA_FILE.to_string(),
            node_type: CREATIVE_WORK.to_string(),
            conforms_to: IdRef::new(ROCRATE_PROFILE),
            identifier: METADATA_FILE.to_string(),
            about: IdRef::new(ROOT_ID),
        }
    }
}

/// Root dataset node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetNode {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub node_type: String,
    #[serde(rename = "contentUrl", skip_serializing_if = "String::is_empty")]
    pub content_url: String,
    #[serde(rename = "datePublished", skip_serializing_if = "String::is_empty")]
    pub date_published: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "hasPart", skip_serializing_if = "Vec::is_empty")]
    pub has_part: Vec<IdRef>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    pub publisher: IdRef,
}

/// Publishing organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationNode {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub node_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// One entry of the `@graph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GraphNode {
    Descriptor(DescriptorNode),
    Dataset(DatasetNode),
    Organization(OrganizationNode),
}

/// RO-Crate metadata document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrateDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@graph")]
    pub graph: Vec<GraphNode>,
}

impl CrateDocument {
    /// The root dataset node
    pub fn dataset(&self) -> Option<&DatasetNode> {
        self.graph.iter().find_map(|node| match node {
            GraphNode::Dataset(dataset) => Some(dataset),
            _ => None,
        })
    }

    /// Pretty JSON with a trailing newline, as written to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        Ok(format!("{}\n", serde_json::to_string_pretty(self)?))
    }
}

/// Assemble the crate document for the given metadata and files
///
/// `hasPart` lists records, then media, then posters. The publisher node is
/// emitted even when the publisher fields are empty.
pub fn assemble_package(metadata: &UserMetadata, parts: &PackageParts) -> CrateDocument {
    let node_type = if metadata.record_type.is_empty() {
        DEFAULT_DATASET_TYPE.to_string()
    } else {
        metadata.record_type.clone()
    };

    let dataset = DatasetNode {
        id: ROOT_ID.to_string(),
        name: metadata.name.clone(),
        node_type,
        content_url: metadata.url.clone(),
        date_published: metadata.date_published.clone(),
        description: metadata.description.clone(),
        has_part: parts.all().map(IdRef::new).collect(),
        identifier: metadata.identifier.clone(),
        keywords: metadata.keyword_list(),
        license: metadata.license.clone(),
        publisher: IdRef::new(metadata.publisher.clone()),
    };

    let publisher = OrganizationNode {
        id: metadata.publisher.clone(),
        node_type: ORGANIZATION.to_string(),
        name: metadata.publisher_name.clone(),
    };

    CrateDocument {
        context: ROCRATE_CONTEXT.to_string(),
        graph: vec![
            GraphNode::Descriptor(DescriptorNode::default()),
            GraphNode::Dataset(dataset),
            GraphNode::Organization(publisher),
        ],
    }
}
