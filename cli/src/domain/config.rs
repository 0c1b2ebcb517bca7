//! Domain types and validators for fuzzrig configuration.
//!
//! Pure functions only — no I/O, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["vultr.api_key"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.fuzzrig/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FuzzrigConfig {
    /// Vultr account settings.
    #[serde(default)]
    pub vultr: VultrConfig,
}

/// Vultr account configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VultrConfig {
    /// Personal access token used as the bearer credential.
    #[serde(default)]
    pub api_key: String,
}

impl FuzzrigConfig {
    /// Returns the Vultr API token.
    ///
    /// `path` is only used to build the error message.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if the token is empty.
    pub fn api_token(&self, path: &str) -> Result<&str, ConfigError> {
        let token = self.vultr.api_key.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingCredential {
                path: path.to_string(),
            });
        }
        Ok(token)
    }
}

/// Masks a secret for display, keeping the first and last four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let secret = secret.trim();
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    if key == "vultr.api_key" && value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "token must not be empty".to_string(),
        }
        .into());
    }
    if key == "vultr.api_key" && value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "token must not contain whitespace".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
