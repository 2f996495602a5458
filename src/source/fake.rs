//! Canned-response transport for tests.

use super::client::Transport;
use super::error::FetchError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) enum Canned {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Serves canned responses by exact URL and records every requested URL in order.
/// Unknown URLs are treated as unreachable.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, Canned>,
    pub(crate) requests: Vec<String>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Body(body.into()));
        self
    }

    pub(crate) fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    pub(crate) fn requests_to(&self, prefix: &str) -> usize {
        self.requests.iter().filter(|u| u.starts_with(prefix)).count()
    }
}

impl Transport for FakeTransport {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        self.requests.push(url.to_string());
        match self.responses.get(url).cloned().unwrap_or(Canned::Unreachable) {
            Canned::Body(body) => Ok(body),
            Canned::Status(status) => Err(FetchError::HttpStatus {
                status,
                url: url.to_string(),
            }),
            Canned::Unreachable => Err(FetchError::network(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }
}
