//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::config::FuzzrigConfig;
use crate::infra::templates::template_text;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV: &str = "FUZZRIG_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store rooted at `$FUZZRIG_CONFIG` or `~/.fuzzrig/config.yaml`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by an explicit file (for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn write_private(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn parse(path: &Path, content: &str) -> Result<FuzzrigConfig> {
        if content.trim().is_empty() {
            return Ok(FuzzrigConfig::default());
        }
        serde_yaml::from_str(content).with_context(|| format!("cannot parse {}", path.display()))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<FuzzrigConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(FuzzrigConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::parse(&path, &content)
    }

    fn load_or_init(&self) -> Result<FuzzrigConfig> {
        let path = self.path()?;
        if !path.exists() {
            let template = template_text("config.yaml")?;
            Self::write_private(&path, template)?;
            tracing::info!(path = %path.display(), "created default settings file");
            return Self::parse(&path, template);
        }
        self.load()
    }

    fn save(&self, config: &FuzzrigConfig) -> Result<()> {
        let path = self.path()?;
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        Self::write_private(&path, &content)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".fuzzrig").join("config.yaml"))
    }
}
