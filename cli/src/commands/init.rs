//! `fuzzrig init` — scaffold the fuzzing layout in the current repository.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::scaffold;
use crate::domain::Language;
use crate::infra::fs::LocalFs;
use crate::infra::templates::EmbeddedTemplates;

/// VS Code server settings, relative to the home directory.
const VSCODE_SETTINGS: &str = ".vscode-server/data/Machine/settings.json";

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Language the harnesses are written in
    #[arg(short, long, value_enum, default_value_t = Language::Rust)]
    pub language: Language,

    /// Also overwrite the VS Code server settings for this project
    #[arg(long)]
    pub vscode_settings: bool,
}

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the current directory is not in a git repository, the
/// user declines, or a file cannot be written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<()> {
    let layout = super::current_project()?;

    app.output.warn(&format!(
        "This overwrites the workflow, fuzz manifest and Dockerfile in {}",
        layout.root().display()
    ));
    if !app.confirm("Continue?", false)? {
        anyhow::bail!("init cancelled");
    }

    let reporter = app.output.reporter();
    scaffold::init_project(&LocalFs, &EmbeddedTemplates, &reporter, &layout, args.language)?;

    if args.vscode_settings {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        scaffold::write_vscode_settings(
            &LocalFs,
            &EmbeddedTemplates,
            &reporter,
            &home.join(VSCODE_SETTINGS),
            &layout,
        )?;
    }
    reporter.clear();

    app.output.success(&format!(
        "{} is ready for {} harnesses",
        layout.project_name(),
        args.language
    ));
    app.output
        .info("Add one with: fuzzrig add-harness <name>");
    Ok(())
}
