//! Open Library adapter (primary source). One request to the Books API in `jscmd=data` mode.

use crate::model::{BookRecord, ChapterEntry};
use crate::source::client::Transport;
use crate::source::error::FetchError;
use crate::source::BookSource;
use serde::Deserialize;
use std::collections::HashMap;

pub const OPENLIBRARY_BASE: &str = "https://openlibrary.org";
const SOURCE_NAME: &str = "Open Library";

/// Shape of one record in the response mapping. Anything else Open Library sends is ignored.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    title: Option<String>,
    /// Absent, null and empty are the same: no table of contents.
    #[serde(default)]
    table_of_contents: Option<Vec<CatalogTocEntry>>,
}

#[derive(Debug, Deserialize)]
struct CatalogTocEntry {
    #[serde(default)]
    title: Option<String>,
}

/// Primary source: Open Library catalog, keyed by `ISBN:<identifier>`.
#[derive(Debug, Clone)]
pub struct OpenLibrary {
    base_url: String,
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new(OPENLIBRARY_BASE)
    }
}

impl OpenLibrary {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The identifier is embedded verbatim.
    pub fn url_for(&self, identifier: &str) -> String {
        format!(
            "{}/api/books?bibkeys=ISBN:{}&format=json&jscmd=data",
            self.base_url, identifier
        )
    }
}

impl BookSource for OpenLibrary {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn fetch(
        &self,
        transport: &mut dyn Transport,
        identifier: &str,
    ) -> Result<BookRecord, FetchError> {
        let body = transport.get(&self.url_for(identifier))?;
        parse_response(&body, identifier)
    }
}

/// Decode a Books API response and pick the record for `identifier`.
pub(crate) fn parse_response(body: &str, identifier: &str) -> Result<BookRecord, FetchError> {
    let mut records: HashMap<String, CatalogRecord> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode {
            source_name: SOURCE_NAME,
            source: e,
        })?;
    let key = format!("ISBN:{}", identifier);
    let record = records.remove(&key).ok_or_else(|| FetchError::NotFound {
        source_name: SOURCE_NAME,
        identifier: identifier.to_string(),
    })?;
    Ok(BookRecord {
        title: record.title.unwrap_or_default(),
        chapters: record
            .table_of_contents
            .unwrap_or_default()
            .into_iter()
            .map(|entry| ChapterEntry::new(entry.title.unwrap_or_default()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::FakeTransport;

    const PRIDE: &str = r#"{"ISBN:0141439556":{"url":"https://openlibrary.org/books/OL1M","title":"Pride and Prejudice","table_of_contents":[{"level":0,"title":"Chapter 1","label":"","pagenum":"1"},{"level":0,"title":"Chapter 2","label":"","pagenum":"5"}]}}"#;

    #[test]
    fn url_embeds_identifier_as_bibkey() {
        let source = OpenLibrary::default();
        assert_eq!(
            source.url_for("0141439556"),
            "https://openlibrary.org/api/books?bibkeys=ISBN:0141439556&format=json&jscmd=data"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let source = OpenLibrary::new("http://localhost:8080/");
        assert!(source.url_for("1").starts_with("http://localhost:8080/api/books?"));
    }

    #[test]
    fn parse_record_with_toc() -> Result<(), FetchError> {
        let book = parse_response(PRIDE, "0141439556")?;
        assert_eq!(book.title, "Pride and Prejudice");
        let titles: Vec<_> = book.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 1", "Chapter 2"]);
        Ok(())
    }

    #[test]
    fn missing_toc_is_empty_not_error() -> Result<(), FetchError> {
        let book = parse_response(r#"{"ISBN:1":{"title":"No Toc"}}"#, "1")?;
        assert_eq!(book.title, "No Toc");
        assert!(book.chapters.is_empty());
        Ok(())
    }

    #[test]
    fn null_fields_read_as_absent() -> Result<(), FetchError> {
        let book = parse_response(
            r#"{"ISBN:1":{"title":null,"table_of_contents":null}}"#,
            "1",
        )?;
        assert_eq!(book.title, "");
        assert!(book.chapters.is_empty());

        let book = parse_response(
            r#"{"ISBN:1":{"title":"T","table_of_contents":[{"title":null},{"title":"Two"}]}}"#,
            "1",
        )?;
        let titles: Vec<_> = book.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["", "Two"]);
        Ok(())
    }

    #[test]
    fn empty_mapping_is_not_found() {
        let result = parse_response("{}", "9999999999");
        assert!(matches!(
            result,
            Err(FetchError::NotFound { identifier, .. }) if identifier == "9999999999"
        ));
    }

    #[test]
    fn other_key_is_not_found() {
        assert!(matches!(
            parse_response(PRIDE, "0000000000"),
            Err(FetchError::NotFound { .. })
        ));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        assert!(matches!(
            parse_response("<html>", "1"),
            Err(FetchError::Decode { .. })
        ));
        assert!(matches!(
            parse_response("[1, 2]", "1"),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn fetch_goes_through_transport() -> Result<(), FetchError> {
        let source = OpenLibrary::default();
        let mut transport = FakeTransport::new().with_body(source.url_for("0141439556"), PRIDE);
        let book = source.fetch(&mut transport, "0141439556")?;
        assert_eq!(book.chapters.len(), 2);
        assert_eq!(transport.requests, vec![source.url_for("0141439556")]);
        Ok(())
    }

    #[test]
    fn transport_failure_propagates() {
        let source = OpenLibrary::default();
        let mut transport = FakeTransport::new();
        assert!(matches!(
            source.fetch(&mut transport, "1"),
            Err(FetchError::Network { .. })
        ));
    }
}
