//! Blocking HTTP transport. One GET per call, no retries.

use super::error::FetchError;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "tocmap/0.1 (+https://github.com/tocmap)";
const MAX_REDIRECTS: usize = 10;

/// Fetches a URL and returns the response body. Injected into every source so tests
/// can serve canned responses instead of touching the network.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<String, FetchError>;
}

/// [Transport] backed by `reqwest::blocking::Client`.
#[derive(Debug)]
pub struct HttpTransport {
    inner: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);
        let response = self
            .inner
            .get(url)
            .send()
            .map_err(|e| FetchError::network(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().map_err(|e| FetchError::network(url, e))
    }
}

/// Builder for [HttpTransport] with optional User-Agent and timeout.
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpTransportBuilder {
    /// Set a custom User-Agent. If not set, a crate default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. If not set, reqwest's default applies.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<HttpTransport, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(HttpTransport {
            inner: builder.build()?,
        })
    }
}
