//! tocmap: fetch a book's table of contents by ISBN (Open Library, falling back to
//! Google Books) and write it as a FreeMind mind map.

pub mod cli;
pub mod config;
pub mod model;
pub mod outline;
pub mod source;

// Re-exports for CLI and consumers.
pub use model::{BookRecord, ChapterEntry};
pub use outline::{
    build_outline, read_outline, render_outline, write_mindmap, write_outline, OutlineError,
    OutlineNode,
};
pub use source::{
    chapters_from_description, fetch_book, fetch_with_fallback, BookSource, Endpoints,
    FetchError, FetchOptions, Fetched, GoogleBooks, HttpTransport, OpenLibrary, Origin,
    SourceSelection, Transport,
};
