//! Top headlines for a configured country

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::config::NewsConfig;
use crate::security::{self, Credential};
use super::web::WebConfig;
use super::{fetch_ok, HttpFetch, HttpRequest, ProviderError, ReqwestFetch};

/// Reply when headlines could not be fetched
pub const NEWS_FAILURE: &str = "Unable to fetch news updates.";

/// First line of every headline listing
pub const NEWS_BANNER: &str = "Here are the latest news headlines:";

#[derive(Debug, Deserialize)]
struct HeadlinesPayload {
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
}

/// Headline lookup bound to one country
pub struct NewsProvider {
    config: NewsConfig,
    api_key: Option<String>,
    fetch: Box<dyn HttpFetch>,
}

impl NewsProvider {
    pub fn new(config: NewsConfig, api_key: Option<String>, fetch: Box<dyn HttpFetch>) -> Self {
        Self { config, api_key, fetch }
    }

    /// Build with the stored API key and a `reqwest` transport
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        let web = WebConfig::with_timeout(Duration::from_secs(config.timeout_secs));
        Ok(Self::new(
            config.clone(),
            security::get_credential(Credential::News),
            Box::new(ReqwestFetch::with_config(&web)?),
        ))
    }

    /// List current headlines under [`NEWS_BANNER`], or return [`NEWS_FAILURE`]
    pub fn headlines(&self) -> Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No news API key configured (set {})", Credential::News.env_var());
            return Ok(NEWS_FAILURE.to_string());
        };

        let request = HttpRequest::new(&self.config.base_url)
            .query("country", &self.config.country)
            .query("apiKey", api_key);

        let Some(body) = fetch_ok(self.fetch.as_ref(), &request, "news") else {
            return Ok(NEWS_FAILURE.to_string());
        };

        let payload: HeadlinesPayload = serde_json::from_str(&body)
            .map_err(|source| ProviderError::MalformedPayload { provider: "news", source })?;

        let titles: Vec<&str> = payload.articles.iter().map(|a| a.title.as_str()).collect();
        Ok(format!("{}\n{}", NEWS_BANNER, titles.join("\n")))
    }
}
