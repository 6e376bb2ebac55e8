//! External information providers
//!
//! This module provides:
//! - An `HttpFetch` seam over outbound GET requests
//! - A `reqwest`-backed implementation with timeouts (see [`web`])
//! - Weather and news providers that format replies for the chat loop
//!
//! Providers only distinguish "got a 200" from "didn't". Transport errors
//! and non-200 statuses both produce the provider's fixed failure message;
//! a 200 with an unexpected body is an error for the caller.

pub mod web;
pub mod weather;
pub mod news;

use thiserror::Error;
use tracing::warn;

pub use web::ReqwestFetch;
pub use weather::{WeatherProvider, WEATHER_FAILURE};
pub use news::{NewsProvider, NEWS_FAILURE};

/// Errors surfaced by providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{provider} response is not valid: {source}")]
    MalformedPayload {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{provider} response is missing {field}")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },
}

/// A GET request with query parameters
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of the first query parameter named `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Query values may carry API keys, so only parameter names are printed
impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.query.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("query", &keys)
            .finish()
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking HTTP GET capability
#[cfg_attr(test, mockall::automock)]
pub trait HttpFetch {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ProviderError>;
}

/// Issue `request` and return the body only for HTTP 200.
///
/// Every other outcome is logged and reported as `None`.
pub(crate) fn fetch_ok(fetch: &dyn HttpFetch, request: &HttpRequest, provider: &str) -> Option<String> {
    match fetch.get(request) {
        Ok(response) if response.status == 200 => Some(response.body),
        Ok(response) => {
            warn!("{} provider returned HTTP {}", provider, response.status);
            None
        }
        Err(e) => {
            warn!("{} provider request to {} failed: {}", provider, request.url, e);
            None
        }
    }
}
