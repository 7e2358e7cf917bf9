//! # Lister Configuration Module
//!
//! Configuration for reading the catalog's results table. The table does not
//! describe itself, so everything the walker relies on is spelled out here:
//! which column holds which field, which language marker terminates the row
//! action URL, and how detail-data URLs are derived.
//!
//! ## Key Components
//!
//! - `Column` / `ColumnLayout`: positional mapping of table cells to fields
//! - `ListerConfig`: the complete listing configuration
//! - `ListerConfigBuilder`: builder for `ListerConfig`

/// Catalog endpoint serving the results table
pub const DEFAULT_TABLE_URL: &str = "https://ink.sammlung.cc/table";

/// Language used for listing when none is given
pub const DEFAULT_LANGUAGE: &str = "de";

/// Number of results requested when none is given
pub const DEFAULT_RESULTS: u32 = 10;

/// Marker after which the catalog appends thumbnail resize parameters
pub const THUMBNAIL_RESIZE_MARKER: &str = "/resize/size100x100/formatPNG/autorotate";

/// Field carried by a column of the results table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Thumbnail image cell
    Image,
    /// Signature / slug cell
    Signature,
    /// Title cell
    Title,
    /// Cell not mapped to a record field
    Ignored,
}

/// Positional mapping from column index to record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl ColumnLayout {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Field at `index`; columns past the layout are ignored
    pub fn column(&self, index: usize) -> Column {
        self.columns.get(index).copied().unwrap_or(Column::Ignored)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new(vec![Column::Image, Column::Signature, Column::Title])
    }
}

/// Configuration for listing the catalog
#[derive(Debug, Clone)]
pub struct ListerConfig {
    /// Results table endpoint
    pub table_url: String,

    /// Language the table is requested in. Also the marker splitting the row
    /// action URL from its query.
    pub language: String,

    /// Language suffix appended to every detail-data URL. The catalog only
    /// serves detail data with this suffix present, whatever the listing
    /// language.
    pub detail_language: String,

    /// Number of results requested in one page
    pub results: u32,

    /// Column order of the results table
    pub columns: ColumnLayout,

    /// Thumbnail URLs are cut at this marker
    pub thumbnail_marker: String,
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            table_url: DEFAULT_TABLE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            detail_language: DEFAULT_LANGUAGE.to_string(),
            results: DEFAULT_RESULTS,
            columns: ColumnLayout::default(),
            thumbnail_marker: THUMBNAIL_RESIZE_MARKER.to_string(),
        }
    }
}

/// Builder for ListerConfig
#[derive(Debug, Default)]
pub struct ListerConfigBuilder {
    config: ListerConfig,
}

impl ListerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ListerConfig::default(),
        }
    }

    /// Set the results table endpoint
    pub fn table_url(mut self, table_url: impl Into<String>) -> Self {
        self.config.table_url = table_url.into();
        self
    }

    /// Set the listing language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Set the language suffix of detail-data URLs
    pub fn detail_language(mut self, detail_language: impl Into<String>) -> Self {
        self.config.detail_language = detail_language.into();
        self
    }

    /// Set the number of results requested
    pub fn results(mut self, results: u32) -> Self {
        self.config.results = results;
        self
    }

    /// Set the column layout of the results table
    pub fn columns(mut self, columns: ColumnLayout) -> Self {
        self.config.columns = columns;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ListerConfig {
        self.config
    }
}

impl ListerConfig {
    /// Create a new builder
    pub fn builder() -> ListerConfigBuilder {
        ListerConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.column(0), Column::Image);
        assert_eq!(layout.column(1), Column::Signature);
        assert_eq!(layout.column(2), Column::Title);
        assert_eq!(layout.column(3), Column::Ignored);
        assert_eq!(layout.column(42), Column::Ignored);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ListerConfig::builder()
            .language("en")
            .results(300)
            .columns(ColumnLayout::new(vec![Column::Title]))
            .build();

        assert_eq!(config.language, "en");
        assert_eq!(config.detail_language, "de");
        assert_eq!(config.results, 300);
        assert_eq!(config.columns.column(0), Column::Title);
        assert_eq!(config.table_url, DEFAULT_TABLE_URL);
    }
}
