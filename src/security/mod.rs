//! Security module
//!
//! Keeps provider API keys out of configuration files and source:
//! - OS keyring integration with a restricted-permission file fallback
//! - Environment variable overrides

pub mod credentials;

use anyhow::Result;

pub use credentials::{Credential, get_credential, has_credential, delete_credential};

/// Store a provider API key securely
pub fn set_api_key(credential: Credential, key: &str) -> Result<()> {
    credentials::set_credential(credential, key)?;
    println!("{} API key stored securely.", credential);
    Ok(())
}
