//! Mapping of catalog detail records onto flattened collection items
//!
//! Every record produces an [`ItemOutcome`]: either a mapped item with the
//! field-level problems met on the way, or a skip with its reason. A missing
//! title is the only reason to skip a record.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collection::{Collection, Identifier, Item, Media, Poster, Relationship};
use crate::config::PipelineOptions;
use crate::gather::convert::{IdentifierKind, media_server_url};
use crate::gather::record::{DetailRecord, Extra, MediaGroup, Note, Reference, Title};

/// Title of the note holding a record's description
const DESCRIPTION_NOTE: &str = "Description";

/// Problems found while mapping a single record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("record has no title")]
    MissingTitle,

    #[error("record has no description")]
    MissingDescription,

    #[error("relationship {index} has no title")]
    MissingRelationshipTitle { index: usize },

    #[error("unknown identifier type: {0}")]
    UnknownIdentifier(String),
}

/// A mapping problem attributed to the data file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub error: MappingError,
}

impl Diagnostic {
    fn new(file: &str, error: MappingError) -> Self {
        Self {
            file: file.to_string(),
            error,
        }
    }

    /// Whether the record was left out of the collection
    pub fn skips_item(&self) -> bool {
        self.error == MappingError::MissingTitle
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.error)
    }
}

/// Result of mapping one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The record became an item
    Mapped {
        item: Item,
        diagnostics: Vec<Diagnostic>,
    },
    /// The record was left out
    Skipped(Diagnostic),
}

/// A collection together with everything reported while building it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub collection: Collection,
    pub diagnostics: Vec<Diagnostic>,
}

impl Normalized {
    /// Diagnostics of records left out of the collection
    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.skips_item())
    }
}

/// Canonical title: the first entry, whatever its language
pub fn resolve_title(titles: &[Title]) -> Result<String, MappingError> {
    titles
        .first()
        .map(|title| title.value.clone())
        .ok_or(MappingError::MissingTitle)
}

/// Text of the `Description` note without its paragraph wrapper
pub fn resolve_description(notes: &[Note]) -> Result<String, MappingError> {
    let note = notes
        .iter()
        .find(|note| note.title == DESCRIPTION_NOTE)
        .ok_or(MappingError::MissingDescription)?;
    Ok(note.text.replacen("<p>", "", 1).replacen("</p>", "", 1))
}

/// Relationships of a record; the first untitled one fails them all
pub fn map_relationships(references: &[Reference]) -> Result<Vec<Relationship>, MappingError> {
    references
        .iter()
        .enumerate()
        .map(|(index, reference)| {
            let label = resolve_title(&reference.title)
                .map_err(|_| MappingError::MissingRelationshipTitle { index })?;
            Ok(Relationship {
                label,
                url: reference.url.clone(),
                poster: Poster {
                    name: reference.poster.name.clone(),
                    url: media_server_url(&reference.poster.uri),
                },
            })
        })
        .collect()
}

/// Media of every group, flattened in order
pub fn map_media(groups: &[MediaGroup]) -> Vec<Media> {
    groups
        .iter()
        .flat_map(|group| &group.items)
        .map(|media| Media {
            name: media.name.clone(),
            mime_type: media.mime_type.clone(),
            url: media_server_url(&media.uri),
        })
        .collect()
}

/// Identifiers of allow-listed kinds; other keys are reported and dropped
pub fn map_identifiers(extra: &[Extra]) -> (Vec<Identifier>, Vec<MappingError>) {
    let mut identifiers = Vec::new();
    let mut unknown = Vec::new();
    for entry in extra {
        match IdentifierKind::from_key(&entry.key) {
            Some(kind) => identifiers.push(Identifier {
                kind: kind.as_str().to_string(),
                name: entry.value.clone(),
                url: kind.resolve(&entry.value),
            }),
            None => unknown.push(MappingError::UnknownIdentifier(entry.key.clone())),
        }
    }
    (identifiers, unknown)
}

/// Map one detail record onto a collection item
pub fn map_record(record: &DetailRecord) -> ItemOutcome {
    let file = record.file_name.as_str();

    let label = match resolve_title(&record.base.title) {
        Ok(label) => label,
        Err(error) => return ItemOutcome::Skipped(Diagnostic::new(file, error)),
    };

    let mut diagnostics = Vec::new();

    let description = resolve_description(&record.notes).unwrap_or_else(|error| {
        diagnostics.push(Diagnostic::new(file, error));
        String::new()
    });

    let relationships = map_relationships(&record.references).unwrap_or_else(|error| {
        diagnostics.push(Diagnostic::new(file, error));
        Vec::new()
    });

    let (identifiers, unknown) = map_identifiers(&record.extra);
    diagnostics.extend(unknown.into_iter().map(|error| Diagnostic::new(file, error)));

    let item = Item {
        label,
        file: record.file_name.clone(),
        license: record.base.license.clone(),
        publisher: record.base.publisher.clone(),
        relationships,
        media: map_media(&record.media),
        identifiers,
        poster: Poster {
            name: record.base.poster.name.clone(),
            url: media_server_url(&record.base.poster.uri),
        },
        description,
        source: record.source.clone(),
    };

    ItemOutcome::Mapped { item, diagnostics }
}

/// Map every record and build the collection from the mapped items
///
/// Field-level diagnostics are logged at debug level, or info with `verbose`.
pub fn make_collection(records: &[DetailRecord], pipeline: PipelineOptions) -> Normalized {
    let mut items = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();

    for record in records {
        match map_record(record) {
            ItemOutcome::Mapped {
                item,
                diagnostics: found,
            } => {
                for diagnostic in &found {
                    if pipeline.verbose {
                        info!("{}", diagnostic);
                    } else {
                        debug!("{}", diagnostic);
                    }
                }
                items.push(item);
                diagnostics.extend(found);
            }
            ItemOutcome::Skipped(diagnostic) => {
                warn!("Skipping record {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    info!(
        "Mapped {} of {} records ({} diagnostics)",
        items.len(),
        records.len(),
        diagnostics.len()
    );

    Normalized {
        collection: Collection::new(items),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gather::record::{Base, MediaItem, PosterRef};

    fn title(value: &str) -> Vec<Title> {
        vec![Title {
            lang: "en".to_string(),
            value: value.to_string(),
        }]
    }

    fn reference(label: Option<&str>, url: &str, poster: &str) -> Reference {
        Reference {
            title: label.map(title).unwrap_or_default(),
            url: url.to_string(),
            poster: PosterRef {
                name: String::new(),
                uri: poster.to_string(),
            },
            ..Reference::default()
        }
    }

    fn record(file: &str, label: Option<&str>) -> DetailRecord {
        DetailRecord {
            base: Base {
                title: label.map(title).unwrap_or_default(),
                license: "CC BY 4.0".to_string(),
                publisher: "Universität Basel".to_string(),
                poster: PosterRef {
                    name: "poster.png".to_string(),
                    uri: "mediaserver:hsm/poster.png".to_string(),
                },
                ..Base::default()
            },
            file_name: file.to_string(),
            notes: vec![Note {
                title: "Description".to_string(),
                text: "<p>A motet cycle.</p>".to_string(),
            }],
            source: "{}".to_string(),
            ..DetailRecord::default()
        }
    }

    #[test]
    fn test_resolve_title_takes_first() {
        let titles = vec![
            Title {
                lang: "de".to_string(),
                value: "Erster".to_string(),
            },
            Title {
                lang: "en".to_string(),
                value: "First".to_string(),
            },
        ];
        assert_eq!(resolve_title(&titles).unwrap(), "Erster");
        assert_eq!(resolve_title(&[]), Err(MappingError::MissingTitle));
    }

    #[test]
    fn test_resolve_description() {
        let notes = vec![
            Note {
                title: "Remarks".to_string(),
                text: "ignored".to_string(),
            },
            Note {
                title: "Description".to_string(),
                text: "<p>First</p><p>Second</p>".to_string(),
            },
        ];
        assert_eq!(resolve_description(&notes).unwrap(), "First<p>Second</p>");
        assert_eq!(resolve_description(&[]), Err(MappingError::MissingDescription));
    }

    #[test]
    fn test_map_record() {
        let mut input = record("c02.json", Some("C02 Beata progenies"));
        input.references = vec![reference(Some("M001"), "https://ink/detail/m001/", "mediaserver:hsm/m001.png")];
        input.media = vec![
            MediaGroup {
                media_type: "image".to_string(),
                items: vec![MediaItem {
                    name: "score.png".to_string(),
                    uri: "mediaserver:hsm/score.png".to_string(),
                    mime_type: "image/png".to_string(),
                }],
            },
            MediaGroup {
                media_type: "audio".to_string(),
                items: vec![MediaItem {
                    name: "take.mp3".to_string(),
                    uri: String::new(),
                    mime_type: "audio/mpeg".to_string(),
                }],
            },
        ];

        let ItemOutcome::Mapped { item, diagnostics } = map_record(&input) else {
            panic!("expected a mapped item");
        };

        assert!(diagnostics.is_empty());
        assert_eq!(item.label, "C02 Beata progenies");
        assert_eq!(item.file, "c02.json");
        assert_eq!(item.license, "CC BY 4.0");
        assert_eq!(item.description, "A motet cycle.");
        assert_eq!(
            item.poster.url,
            "https://ba14ns21403-sec1.fhnw.ch/mediasrv/hsm/poster.png/master"
        );
        assert_eq!(item.relationships[0].label, "M001");
        assert_eq!(
            item.relationships[0].poster.url,
            "https://ba14ns21403-sec1.fhnw.ch/mediasrv/hsm/m001.png/master"
        );
        assert_eq!(item.media.len(), 2);
        assert_eq!(item.media[1].url, "");
        assert_eq!(item.source, "{}");
    }

    #[test]
    fn test_missing_title_skips() {
        let outcome = map_record(&record("m001.json", None));
        assert_eq!(
            outcome,
            ItemOutcome::Skipped(Diagnostic {
                file: "m001.json".to_string(),
                error: MappingError::MissingTitle,
            })
        );
    }

    #[test]
    fn test_missing_description_keeps_item() {
        let mut input = record("m002.json", Some("M002"));
        input.notes.clear();

        let ItemOutcome::Mapped { item, diagnostics } = map_record(&input) else {
            panic!("expected a mapped item");
        };
        assert_eq!(item.description, "");
        assert_eq!(diagnostics[0].error, MappingError::MissingDescription);
        assert!(!diagnostics[0].skips_item());
    }

    #[test]
    fn test_untitled_relationship_drops_all_relationships() {
        let mut input = record("m003.json", Some("M003"));
        input.references = vec![
            reference(Some("ok"), "https://ink/detail/a/", ""),
            reference(None, "https://ink/detail/b/", ""),
            reference(Some("ok"), "https://ink/detail/c/", ""),
        ];

        let ItemOutcome::Mapped { item, diagnostics } = map_record(&input) else {
            panic!("expected a mapped item");
        };
        assert!(item.relationships.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                file: "m003.json".to_string(),
                error: MappingError::MissingRelationshipTitle { index: 1 },
            }]
        );
    }

    #[test]
    fn test_identifiers() {
        let extra = vec![
            Extra {
                key: "ark".to_string(),
                value: "ark:/15737/p658-sjm6-66z4".to_string(),
            },
            Extra {
                key: "shelfmark".to_string(),
                value: "A 12".to_string(),
            },
            Extra {
                key: "handle".to_string(),
                value: "20.500.11806/med/3jzx-tf3s-g1".to_string(),
            },
        ];

        let (identifiers, unknown) = map_identifiers(&extra);
        assert_eq!(identifiers.len(), 2);
        assert_eq!(identifiers[0].kind, "ark");
        assert_eq!(identifiers[0].url, "https://n2t.net/ark:/15737/p658-sjm6-66z4");
        assert_eq!(identifiers[1].kind, "handle");
        assert_eq!(identifiers[1].name, "20.500.11806/med/3jzx-tf3s-g1");
        assert_eq!(
            unknown,
            vec![MappingError::UnknownIdentifier("shelfmark".to_string())]
        );
    }

    #[test]
    fn test_make_collection() {
        let mut first = record("c02.json", Some("C02"));
        first.references = vec![
            reference(Some("a"), "https://ink/detail/a/", "P"),
            reference(Some("b"), "https://ink/detail/b/", "P"),
        ];
        first.base.poster.uri = "P".to_string();
        let skipped = record("bad.json", None);
        let second = record("m001.json", Some("M001"));

        let records = [first, skipped, second];
        let normalized = make_collection(&records, PipelineOptions::default());
        assert_eq!(
            make_collection(&records, PipelineOptions::new(false, true)),
            normalized
        );

        let labels: Vec<&str> = normalized
            .collection
            .items()
            .iter()
            .map(|item| item.label.as_str())
            .collect();
        assert_eq!(labels, ["C02", "M001"]);
        assert_eq!(
            normalized.collection.poster_urls(),
            [
                "P/master",
                "https://ba14ns21403-sec1.fhnw.ch/mediasrv/hsm/poster.png/master"
            ]
        );
        assert_eq!(
            normalized.collection.related_urls(),
            ["https://ink/detail/a/", "https://ink/detail/b/"]
        );

        let skipped: Vec<&Diagnostic> = normalized.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].file, "bad.json");
    }
}
