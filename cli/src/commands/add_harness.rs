//! `fuzzrig add-harness` — add a harness and register it in the workflow.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::harness::{self, WorkflowUpdate};
use crate::domain::Language;
use crate::infra::fs::LocalFs;
use crate::infra::templates::EmbeddedTemplates;

/// Arguments for the add-harness command.
#[derive(Args)]
pub struct AddHarnessArgs {
    /// Harness name, in snake case
    pub name: String,

    /// Language of the harness stub
    #[arg(short, long, value_enum, default_value_t = Language::Rust)]
    pub language: Language,
}

/// Run the add-harness command.
///
/// # Errors
///
/// Returns an error for an invalid name, a missing repository, or a file
/// that cannot be written. A workflow that cannot be edited is only a warning.
pub fn run(app: &AppContext, args: &AddHarnessArgs) -> Result<()> {
    let layout = super::current_project()?;
    let reporter = app.output.reporter();
    let update = harness::add_harness(
        &LocalFs,
        &EmbeddedTemplates,
        &reporter,
        &layout,
        &args.name,
        args.language,
    )?;
    reporter.clear();

    if let WorkflowUpdate::ManualEditRequired {
        key_path, entry, ..
    } = update
    {
        app.output.info(&format!(
            "Add this entry to the `{key_path}` list in {}:",
            layout.workflow_file().display()
        ));
        app.output.block(&format!("- {entry}"));
    }

    app.output.success(&format!("Harness {} added", args.name));
    Ok(())
}
