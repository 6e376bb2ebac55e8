//! Configuration management
//!
//! Manages knowledge base location, matcher tuning, and provider settings.
//! API keys are never stored here; see [`crate::security`].

use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Knowledge base location
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Question matching settings
    #[serde(default)]
    pub matcher: MatcherConfig,
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// News provider settings
    #[serde(default)]
    pub news: NewsConfig,
    /// Chat loop settings
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path to the knowledge base JSON file
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("knowledge_base.json")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity (0.0 to 1.0, inclusive) for a question to match
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// How many candidates to keep before taking the best
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_cutoff() -> f64 {
    0.6
}

fn default_max_candidates() -> usize {
    2
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            max_candidates: default_max_candidates(),
        }
    }
}

/// Unit the weather temperature is reported in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Convert the Celsius reading and label it °F
    #[default]
    Fahrenheit,
    /// Report the Celsius reading as-is
    Celsius,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit
    pub fn convert_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Celsius => celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            other => anyhow::bail!("Unknown unit '{}'. Use 'fahrenheit' or 'celsius'", other),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Fahrenheit => write!(f, "fahrenheit"),
            TemperatureUnit::Celsius => write!(f, "celsius"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// City query sent to the provider, e.g. "McLean,US"
    #[serde(default = "default_location")]
    pub location: String,
    /// Place name shown to the user (defaults to the city part of `location`)
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unit: TemperatureUnit,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_location() -> String {
    "McLean,US".to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            label: None,
            unit: TemperatureUnit::default(),
            base_url: default_weather_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    /// Name of the place used in the weather sentence
    pub fn display_label(&self) -> &str {
        match &self.label {
            Some(label) => label,
            None => self
                .location
                .split(',')
                .next()
                .unwrap_or(&self.location)
                .trim(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Two-letter country code for top headlines
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_news_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_news_url() -> String {
    "https://newsapi.org/v2/top-headlines".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            base_url: default_news_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which entity extractor the chat loop uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityMode {
    #[default]
    Heuristic,
    None,
}

impl std::fmt::Display for EntityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityMode::Heuristic => write!(f, "heuristic"),
            EntityMode::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub entities: EntityMode,
}

impl Config {
    /// Load configuration from the default location, creating it if absent
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "learnbot", "learnbot")
        .context("Failed to get project directories")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the configuration directory path
pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Configuration ({})", config_path()?.display());
    println!("  knowledge base:   {}", config.knowledge.path.display());
    println!("  match cutoff:     {}", config.matcher.cutoff);
    println!("  max candidates:   {}", config.matcher.max_candidates);
    println!("  weather location: {} (shown as {})", config.weather.location, config.weather.display_label());
    println!("  weather unit:     {}", config.weather.unit);
    println!("  news country:     {}", config.news.country);
    println!("  entity extractor: {}", config.chat.entities);
    println!();
    println!("  weather API key:  {}", key_status(crate::security::Credential::Weather));
    println!("  news API key:     {}", key_status(crate::security::Credential::News));

    Ok(())
}

fn key_status(credential: crate::security::Credential) -> &'static str {
    if crate::security::has_credential(credential) {
        "Configured"
    } else {
        "Not configured"
    }
}

/// Set the weather location query
pub fn set_location(location: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.weather.location = location.to_string();
    config.save()?;
    println!("Weather location set to {}", location);
    Ok(())
}

/// Set the news country
pub fn set_country(country: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.news.country = country.to_lowercase();
    config.save()?;
    println!("News country set to {}", config.news.country);
    Ok(())
}

/// Set the temperature unit
pub fn set_unit(unit: &str) -> Result<()> {
    let unit: TemperatureUnit = unit.parse()?;
    let mut config = Config::load()?;
    config.weather.unit = unit;
    config.save()?;
    println!("Temperature unit set to {}", unit);
    Ok(())
}

/// Reset configuration to defaults
pub fn reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.matcher.cutoff, 0.6);
        assert_eq!(config.matcher.max_candidates, 2);
        assert_eq!(config.weather.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(config.news.country, "us");
        assert_eq!(config.knowledge.path, PathBuf::from("knowledge_base.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [weather]
            location = "Oslo,NO"
            unit = "celsius"
            "#,
        )
        .unwrap();
        assert_eq!(config.weather.location, "Oslo,NO");
        assert_eq!(config.weather.unit, TemperatureUnit::Celsius);
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.matcher, MatcherConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.news.country = "gb".to_string();
        config.chat.entities = EntityMode::None;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_display_label() {
        let mut weather = WeatherConfig::default();
        assert_eq!(weather.display_label(), "McLean");
        weather.label = Some("Home".to_string());
        assert_eq!(weather.display_label(), "Home");
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(TemperatureUnit::Fahrenheit.convert_celsius(20.0), 68.0);
        assert_eq!(TemperatureUnit::Fahrenheit.convert_celsius(-40.0), -40.0);
        assert_eq!(TemperatureUnit::Celsius.convert_celsius(20.0), 20.0);
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_entity_mode_display_matches_config_value() {
        assert_eq!(EntityMode::Heuristic.to_string(), "heuristic");
        assert_eq!(EntityMode::None.to_string(), "none");

        let mut config = Config::default();
        config.chat.entities = EntityMode::None;
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains(&format!("entities = \"{}\"", EntityMode::None)));
    }
}
