//! Record extraction from the catalog's results table

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::lister::config::{Column, ListerConfig};
use crate::lister::error::ListError;
use crate::lister::RawRecord;

/// Prefix of the navigation assignment held in a row's `onclick`
const NAVIGATION_PREFIX: &str = "window.location='";

/// Escaped double slash as rendered inside the `onclick` script
const ESCAPED_SLASHES: &str = "\\/\\/";

const DETAIL_SEGMENT: &str = "/detail/";
const DETAIL_DATA_SEGMENT: &str = "/detail-data/";

/// Parse raw results-table bytes into a document
///
/// Fails when the bytes are not a UTF-8 document. Markup errors are recovered
/// by the HTML parser and only logged.
pub fn parse_document(html: &[u8]) -> Result<Html, ListError> {
    let text = std::str::from_utf8(html)
        .map_err(|e| ListError::HtmlParse(format!("results are not valid UTF-8: {}", e)))?;
    let document = Html::parse_document(text);
    if !document.errors.is_empty() {
        debug!("HTML parser recovered from {} errors", document.errors.len());
    }
    Ok(document)
}

/// Parse the results table and extract one record per row
pub fn extract_table(html: &[u8], config: &ListerConfig) -> Result<Vec<RawRecord>, ListError> {
    let document = parse_document(html)?;
    Ok(walk_document(&document, config))
}

/// Extract one record per row of the first table body in the document
///
/// Every `tr` below the table body becomes a record, rows nested deeper than
/// the body's direct children included.
pub fn walk_document(document: &Html, config: &ListerConfig) -> Vec<RawRecord> {
    let Some(body) = find_table_body(document.root_element()) else {
        warn!("No table body found in results");
        return Vec::new();
    };

    let records: Vec<RawRecord> = body
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "tr")
        .map(|row| parse_row(row, config))
        .collect();

    debug!("Extracted {} records from results table", records.len());
    records
}

/// Depth-first search for the first `tbody` element
fn find_table_body(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if element.value().name() == "tbody" {
        return Some(element);
    }
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find_map(find_table_body)
}

/// Map a single table row onto a record by column position
fn parse_row(row: ElementRef<'_>, config: &ListerConfig) -> RawRecord {
    let mut record = RawRecord::default();

    if let Some(onclick) = row.value().attr("onclick") {
        let url = action_url(onclick, &config.language);
        record.detail_url = detail_url(&url, &config.detail_language);
        record.url = url;
    }

    let cells = row.children().filter_map(ElementRef::wrap);
    for (index, cell) in cells.enumerate() {
        match config.columns.column(index) {
            Column::Image => {
                let src = cell
                    .descendants()
                    .filter_map(ElementRef::wrap)
                    .find_map(|element| element.value().attr("src"));
                if let Some(src) = src {
                    record.thumbnail_url = normalize_thumbnail(src, &config.thumbnail_marker);
                }
            }
            Column::Signature => record.signature = cell_text(cell),
            Column::Title => record.title = cell_text(cell),
            Column::Ignored => {}
        }
    }

    record
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extract the record URL from a row's `onclick` script
///
/// Removes the navigation assignment, unescapes the first doubled slash and
/// keeps everything before the first `<language>?` marker.
pub fn action_url(onclick: &str, language: &str) -> String {
    let script = onclick
        .replacen(NAVIGATION_PREFIX, "", 1)
        .replacen(ESCAPED_SLASHES, "//", 1);
    let marker = format!("{}?", language);
    match script.split_once(&marker) {
        Some((url, _)) => url.to_string(),
        None => script,
    }
}

/// Derive the detail-data URL for a record URL
///
/// The first `/detail/` segment becomes `/detail-data/` and `<language>?` is
/// always appended. Empty in, empty out.
pub fn detail_url(url: &str, language: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    format!("{}{}?", url.replacen(DETAIL_SEGMENT, DETAIL_DATA_SEGMENT, 1), language)
}

/// Strip the resize parameters from a thumbnail URL
pub fn normalize_thumbnail(src: &str, marker: &str) -> String {
    let base = match src.split_once(marker) {
        Some((base, _)) => base,
        None => src,
    };
    base.trim().to_string()
}
