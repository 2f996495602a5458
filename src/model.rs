//! Canonical data model for fetched book metadata.
//!
//! Both sources produce [BookRecord]; the outline writer and the JSON output consume it.

use serde::{Deserialize, Serialize};

/// One book: title plus table of contents in source order. `chapters` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub chapters: Vec<ChapterEntry>,
}

/// One table-of-contents entry. Heuristically derived when it comes from a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub title: String,
}

impl ChapterEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl BookRecord {
    pub fn new(title: impl Into<String>, chapters: Vec<ChapterEntry>) -> Self {
        Self {
            title: title.into(),
            chapters,
        }
    }

    pub fn has_chapters(&self) -> bool {
        !self.chapters.is_empty()
    }
}
