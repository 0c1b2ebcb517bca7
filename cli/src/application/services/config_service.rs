//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{FuzzrigConfig, validate_config_key, validate_config_value};

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<FuzzrigConfig> {
    store.load()
}

/// Load configuration, creating the file from the default template if absent.
pub fn ensure_config(store: &impl ConfigStore) -> Result<FuzzrigConfig> {
    store.load_or_init()
}

/// Validate and apply `key = value`, then persist.
///
/// # Errors
///
/// Returns an error if the key or value is invalid or the file cannot be written.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<FuzzrigConfig> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load_or_init()?;
    match key {
        "vultr.api_key" => config.vultr.api_key = value.trim().to_string(),
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    store.save(&config)?;
    Ok(config)
}

/// Load configuration and return it together with the validated API token.
///
/// # Errors
///
/// Returns [`crate::domain::ConfigError::MissingCredential`] if no token is set.
pub fn load_with_token(store: &impl ConfigStore) -> Result<(FuzzrigConfig, String)> {
    let config = store.load_or_init()?;
    let path = store.path()?;
    let token = config.api_token(&path.display().to_string())?.to_string();
    Ok((config, token))
}
