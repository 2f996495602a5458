//! Book sources and the fallback coordinator. Transport trait, source trait, and adapters.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;

pub mod googlebooks;
pub mod openlibrary;

pub use client::{HttpTransport, HttpTransportBuilder, Transport};
pub use error::FetchError;
pub use googlebooks::{chapters_from_description, GoogleBooks};
pub use openlibrary::OpenLibrary;

use crate::model::BookRecord;

/// Implemented by each bibliographic API adapter.
pub trait BookSource {
    /// Human-readable name for messages and logs.
    fn name(&self) -> &'static str;

    fn fetch(&self, transport: &mut dyn Transport, identifier: &str)
        -> Result<BookRecord, FetchError>;
}

/// Which source produced the returned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Primary,
    Secondary,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub book: BookRecord,
    pub origin: Origin,
    /// [BookSource::name] of the source that produced `book`.
    pub source_name: &'static str,
}

/// Which sources to consult. `Auto` is the primary-then-secondary fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceSelection {
    #[default]
    Auto,
    PrimaryOnly,
    SecondaryOnly,
}

/// Base URLs for both APIs. Defaults point at the public services.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub catalog_url: String,
    pub search_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            catalog_url: openlibrary::OPENLIBRARY_BASE.to_string(),
            search_url: googlebooks::GOOGLEBOOKS_BASE.to_string(),
        }
    }
}

/// Options for a fetch run.
#[derive(Default)]
pub struct FetchOptions<'a> {
    /// Called with the primary failure just before the secondary source is queried.
    pub on_fallback: Option<&'a dyn Fn(&FetchError)>,
    pub selection: SourceSelection,
}

/// Query `primary`; if it fails or has no chapters, query `secondary` exactly once.
///
/// A secondary record is returned even when its chapter list is empty; callers decide
/// what an empty table of contents means. When both fail the error carries both causes.
pub fn fetch_with_fallback(
    transport: &mut dyn Transport,
    primary: &dyn BookSource,
    secondary: &dyn BookSource,
    identifier: &str,
    options: &FetchOptions<'_>,
) -> Result<Fetched, FetchError> {
    let primary_failure = match primary.fetch(transport, identifier) {
        Ok(book) if book.has_chapters() => {
            log::info!("got ToC from primary source ({})", primary.name());
            return Ok(Fetched {
                book,
                origin: Origin::Primary,
                source_name: primary.name(),
            });
        }
        Ok(_) => FetchError::EmptyResult {
            source_name: primary.name(),
            identifier: identifier.to_string(),
        },
        Err(e) => e,
    };

    log::info!(
        "{} failed or had no ToC ({}); trying {}",
        primary.name(),
        primary_failure,
        secondary.name()
    );
    if let Some(cb) = options.on_fallback {
        cb(&primary_failure);
    }

    match secondary.fetch(transport, identifier) {
        Ok(book) => {
            log::info!("fallback successful ({})", secondary.name());
            Ok(Fetched {
                book,
                origin: Origin::Secondary,
                source_name: secondary.name(),
            })
        }
        Err(e) => Err(FetchError::AllSourcesFailed {
            primary: Box::new(primary_failure),
            secondary: Box::new(e),
        }),
    }
}

/// Fetch `identifier` from Open Library and Google Books according to `options.selection`.
pub fn fetch_book(
    transport: &mut dyn Transport,
    endpoints: &Endpoints,
    identifier: &str,
    options: &FetchOptions<'_>,
) -> Result<Fetched, FetchError> {
    let primary = OpenLibrary::new(endpoints.catalog_url.as_str());
    let secondary = GoogleBooks::new(endpoints.search_url.as_str());
    match options.selection {
        SourceSelection::Auto => {
            fetch_with_fallback(transport, &primary, &secondary, identifier, options)
        }
        SourceSelection::PrimaryOnly => Ok(Fetched {
            book: primary.fetch(transport, identifier)?,
            origin: Origin::Primary,
            source_name: primary.name(),
        }),
        SourceSelection::SecondaryOnly => Ok(Fetched {
            book: secondary.fetch(transport, identifier)?,
            origin: Origin::Secondary,
            source_name: secondary.name(),
        }),
    }
}
