//! Shared error type for the book sources and the fallback coordinator.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of one source, or of the whole fallback chain.
#[derive(Debug, Error)]
pub enum FetchError {
    // Transport
    #[error("Network error: could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    // Response shape
    #[error("{source_name} returned malformed JSON: {source}")]
    Decode {
        source_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_name} has no book data for ISBN {identifier}")]
    NotFound {
        source_name: &'static str,
        identifier: String,
    },

    /// Record found but without chapters. Only the coordinator builds this.
    #[error("{source_name} has no table of contents for ISBN {identifier}")]
    EmptyResult {
        source_name: &'static str,
        identifier: String,
    },

    #[error("both sources failed: {primary}; {secondary}")]
    AllSourcesFailed {
        primary: Box<FetchError>,
        #[source]
        secondary: Box<FetchError>,
    },
}

impl FetchError {
    pub(crate) fn network(url: &str, source: impl Into<BoxError>) -> Self {
        FetchError::Network {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
