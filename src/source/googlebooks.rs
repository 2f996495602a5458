//! Google Books adapter (secondary source). Google exposes no table of contents, so chapters
//! are guessed from the description text.

use crate::model::{BookRecord, ChapterEntry};
use crate::source::client::Transport;
use crate::source::error::FetchError;
use crate::source::BookSource;
use serde::Deserialize;

pub const GOOGLEBOOKS_BASE: &str = "https://www.googleapis.com";
const SOURCE_NAME: &str = "Google Books";

/// Description lines must be longer than this (in characters, after trimming) to count as a chapter.
pub const MIN_CHAPTER_LINE_CHARS: usize = 5;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Absent, null and empty all mean no match.
    #[serde(default)]
    items: Option<Vec<VolumeItem>>,
}

#[derive(Debug, Deserialize)]
struct VolumeItem {
    #[serde(rename = "volumeInfo", default)]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Secondary source: Google Books volume search by `isbn:<identifier>`.
#[derive(Debug, Clone)]
pub struct GoogleBooks {
    base_url: String,
}

impl Default for GoogleBooks {
    fn default() -> Self {
        Self::new(GOOGLEBOOKS_BASE)
    }
}

impl GoogleBooks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, identifier: &str) -> String {
        format!("{}/books/v1/volumes?q=isbn:{}", self.base_url, identifier)
    }
}

impl BookSource for GoogleBooks {
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

/// Decode a volume search response. Only the first item is used.
pub(crate) fn parse_response(body: &str, identifier: &str) -> Result<BookRecord, FetchError> {
    let response: VolumesResponse = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        source_name: SOURCE_NAME,
        source: e,
    })?;
    let info = response
        .items
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|item| item.volume_info.unwrap_or_default())
        .ok_or_else(|| FetchError::NotFound {
            source_name: SOURCE_NAME,
            identifier: identifier.to_string(),
        })?;
    let chapters = info
        .description
        .as_deref()
        .map(chapters_from_description)
        .unwrap_or_default();
    Ok(BookRecord {
        title: info.title.unwrap_or_default(),
        chapters,
    })
}

/// Heuristic table of contents: every trimmed description line longer than
/// [MIN_CHAPTER_LINE_CHARS] characters becomes one chapter, in order.
///
/// This is a guess from content shape, not from any outline field. Short lines such as
/// "Intro" (exactly five characters) are dropped along with blank ones.
pub fn chapters_from_description(description: &str) -> Vec<ChapterEntry> {
    description
        .split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_CHAPTER_LINE_CHARS)
        .map(ChapterEntry::new)
        .collect()
}
