//! HTTP transport for the providers
//!
//! Wraps a blocking `reqwest` client configured with a timeout and user
//! agent. Errors are stripped of their URL before being reported because
//! provider URLs carry API keys in the query string.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use super::{HttpFetch, HttpRequest, HttpResponse, ProviderError};

/// Default timeout for provider requests (10 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("{}/{} ({})", crate::NAME, crate::VERSION, std::env::consts::OS),
        }
    }
}

impl WebConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// `HttpFetch` backed by `reqwest::blocking`
#[derive(Clone)]
pub struct ReqwestFetch {
    client: reqwest::blocking::Client,
}

impl ReqwestFetch {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&WebConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: &WebConfig) -> Result<Self> {
        Ok(Self {
            client: Self::build_client(config)?,
        })
    }

    /// Build the HTTP client
    fn build_client(config: &WebConfig) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build HTTP client")
    }
}

impl HttpFetch for ReqwestFetch {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ProviderError> {
        debug!("GET {}", request.url);

        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        debug!("GET {} -> {} ({} bytes)", request.url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
