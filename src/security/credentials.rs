//! Provider API key storage
//!
//! Lookup order: environment variable, OS keyring, then a 0600 file in the
//! config directory (used when the keyring is unavailable).

use anyhow::{Result, Context};
use std::path::PathBuf;
use std::fs;

const SERVICE_NAME: &str = "learnbot";

/// A provider credential the agent knows how to store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Weather,
    News,
}

impl Credential {
    fn username(&self) -> &'static str {
        match self {
            Credential::Weather => "openweathermap-api-key",
            Credential::News => "newsapi-api-key",
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Credential::Weather => "weather_api_key.txt",
            Credential::News => "news_api_key.txt",
        }
    }

    /// Environment variable that overrides stored keys
    pub fn env_var(&self) -> &'static str {
        match self {
            Credential::Weather => "LEARNBOT_WEATHER_API_KEY",
            Credential::News => "LEARNBOT_NEWS_API_KEY",
        }
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Weather => write!(f, "weather"),
            Credential::News => write!(f, "news"),
        }
    }
}

/// Get the path for the fallback key file
fn key_file_path(credential: Credential) -> Result<PathBuf> {
    let dir = crate::config::config_dir()?;
    fs::create_dir_all(&dir).context("Failed to create config directory")?;
    Ok(dir.join(credential.file_name()))
}

/// Store a key - tries keyring first, falls back to file
pub fn set_credential(credential: Credential, key: &str) -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, credential.username()) {
        if entry.set_password(key).is_ok() {
            // Also save to file as backup in case keyring retrieval fails
            let _ = save_to_file(credential, key);
            return Ok(());
        }
    }

    save_to_file(credential, key)?;
    println!("Note: Using file-based storage (keyring unavailable)");
    Ok(())
}

fn save_to_file(credential: Credential, key: &str) -> Result<()> {
    let path = key_file_path(credential)?;
    fs::write(&path, key).context("Failed to write API key file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .context("Failed to set file permissions")?;
    }

    Ok(())
}

/// Get a key, or `None` if it is not configured anywhere
pub fn get_credential(credential: Credential) -> Option<String> {
    if let Ok(key) = std::env::var(credential.env_var()) {
        if !key.trim().is_empty() {
            return Some(key.trim().to_string());
        }
    }

    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, credential.username()) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    let path = key_file_path(credential).ok()?;
    let key = fs::read_to_string(path).ok()?;
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Check if a key is available
pub fn has_credential(credential: Credential) -> bool {
    get_credential(credential).is_some()
}

/// Delete a key from both keyring and file
pub fn delete_credential(credential: Credential) -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, credential.username()) {
        let _ = entry.delete_credential();
    }

    let path = key_file_path(credential)?;
    if path.exists() {
        fs::remove_file(&path).context("Failed to delete API key file")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_distinct() {
        assert_ne!(Credential::Weather.username(), Credential::News.username());
        assert_ne!(Credential::Weather.file_name(), Credential::News.file_name());
        assert_ne!(Credential::Weather.env_var(), Credential::News.env_var());
    }

    #[test]
    fn test_display() {
        assert_eq!(Credential::Weather.to_string(), "weather");
        assert_eq!(Credential::News.to_string(), "news");
    }
}
