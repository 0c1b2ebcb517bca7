//! `fuzzrig config` / `fuzzrig create-config` — settings file management.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::config::mask_secret;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written, or the
/// key or value is invalid.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

/// Create the settings file from the default template if it is missing.
///
/// # Errors
///
/// Returns an error if the file cannot be created or parsed.
pub fn create(app: &AppContext) -> Result<()> {
    let path = app.config_store.path()?;
    let existed = path.exists();
    config_service::ensure_config(&app.config_store)?;
    if existed {
        app.output
            .info(&format!("Settings already exist at {}", path.display()));
    } else {
        app.output
            .success(&format!("Created settings at {}", path.display()));
    }
    Ok(())
}

fn show_config(app: &AppContext) -> Result<()> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    app.output.header("Settings");
    app.output.kv("file", &path.display().to_string());
    app.output
        .kv("vultr.api_key", &mask_secret(&config.vultr.api_key));
    Ok(())
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<()> {
    config_service::set_value(&app.config_store, key, value)?;
    let shown = if key == "vultr.api_key" {
        mask_secret(value)
    } else {
        value.to_string()
    };
    app.output.success(&format!("Set {key} = {shown}"));
    Ok(())
}
