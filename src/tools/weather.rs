//! Current weather for a configured location
//!
//! Always requests metric readings and converts them to the configured
//! unit, so the numeric value and its label stay consistent.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::config::{TemperatureUnit, WeatherConfig};
use crate::security::{self, Credential};
use super::web::WebConfig;
use super::{fetch_ok, HttpFetch, HttpRequest, ProviderError, ReqwestFetch};

/// Reply when the weather could not be fetched
pub const WEATHER_FAILURE: &str = "Unable to fetch weather information.";

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    main: MainReading,
    weather: Vec<Conditions>,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Conditions {
    description: String,
}

/// Weather lookup bound to one location
pub struct WeatherProvider {
    config: WeatherConfig,
    api_key: Option<String>,
    fetch: Box<dyn HttpFetch>,
}

impl WeatherProvider {
    pub fn new(config: WeatherConfig, api_key: Option<String>, fetch: Box<dyn HttpFetch>) -> Self {
        Self { config, api_key, fetch }
    }

    /// Build with the stored API key and a `reqwest` transport
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let web = WebConfig::with_timeout(Duration::from_secs(config.timeout_secs));
        Ok(Self::new(
            config.clone(),
            security::get_credential(Credential::Weather),
            Box::new(ReqwestFetch::with_config(&web)?),
        ))
    }

    /// Describe the current weather, or return [`WEATHER_FAILURE`].
    ///
    /// Errors only when the provider answers 200 with an unusable body.
    pub fn current_weather(&self) -> Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No weather API key configured (set {})", Credential::Weather.env_var());
            return Ok(WEATHER_FAILURE.to_string());
        };

        let request = HttpRequest::new(&self.config.base_url)
            .query("q", &self.config.location)
            .query("appid", api_key)
            .query("units", "metric");

        let Some(body) = fetch_ok(self.fetch.as_ref(), &request, "weather") else {
            return Ok(WEATHER_FAILURE.to_string());
        };

        let payload: WeatherPayload = serde_json::from_str(&body)
            .map_err(|source| ProviderError::MalformedPayload { provider: "weather", source })?;
        let conditions = payload.weather.first().ok_or(ProviderError::MissingField {
            provider: "weather",
            field: "weather[0].description",
        })?;

        Ok(format_weather(
            self.config.display_label(),
            &conditions.description,
            payload.main.temp,
            self.config.unit,
        ))
    }
}

/// Render a weather sentence from a Celsius reading
pub fn format_weather(place: &str, description: &str, celsius: f64, unit: TemperatureUnit) -> String {
    format!(
        "The current weather in {} is {} with a temperature of {:.1}°{}.",
        place,
        description,
        unit.convert_celsius(celsius),
        unit.symbol()
    )
}
