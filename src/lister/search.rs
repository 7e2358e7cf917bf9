//! Results-table URLs for catalog searches and collections

use base64::Engine;
use tracing::info;

use crate::lister::error::ListError;

/// What to list from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Free-text search
    Text(String),
    /// Numbered catalog collection
    Collection(u32),
}

impl SearchQuery {
    /// Pick the query from the CLI inputs; a collection number wins over a
    /// search term
    pub fn from_args(search: Option<&str>, collection: u32) -> Result<Self, ListError> {
        if collection > 0 {
            return Ok(SearchQuery::Collection(collection));
        }
        match search {
            Some(term) if !term.is_empty() => Ok(SearchQuery::Text(term.to_string())),
            _ => Err(ListError::InvalidRequest(
                "a search term or a collection number is required".to_string(),
            )),
        }
    }
}

/// Base64 cursor requesting the first `results` entries in one page
pub fn result_params(results: u32) -> String {
    info!("Maximum number of results requested: {}", results);
    let params = format!("{{\"from\": 0, \"size\": {}}}", results);
    base64::engine::general_purpose::STANDARD.encode(params)
}

/// Results-table URL for a query
pub fn search_url(table_url: &str, language: &str, query: &SearchQuery, results: u32) -> String {
    let cursor = result_params(results);
    match query {
        SearchQuery::Text(term) => {
            let term: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
            format!("{}/{}?search={}&cursor={}", table_url, language, term, cursor)
        }
        SearchQuery::Collection(id) => format!(
            "{}/{}?search=&collections={}&cursor={}",
            table_url, language, id, cursor
        ),
    }
}
