//! Application service — `fuzzrig add-harness`.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ProjectFs, TemplateRenderer};
use crate::application::services::scaffold::{append_template, write_template};
use crate::domain::workflow::{self, WorkflowTarget, mayhemfile_entry};
use crate::domain::{Language, ProjectLayout, validate_harness_name};

/// Result of the workflow list update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowUpdate {
    /// The entry was appended to the workflow list.
    Appended,
    /// The workflow could not be edited; the user must add `entry` by hand.
    ManualEditRequired {
        reason: String,
        key_path: String,
        entry: String,
    },
}

/// Add harness `name` to the scaffold in `layout`.
///
/// The name is validated before anything is written. A workflow that cannot
/// be parsed or lacks the matrix list is reported as
/// [`WorkflowUpdate::ManualEditRequired`] and the remaining steps still run;
/// any other failure aborts, leaving already-written files in place.
///
/// # Errors
///
/// Returns [`crate::domain::HarnessError::InvalidName`] for a non-snake-case
/// name, or an I/O error from writing a scaffold file.
pub fn add_harness(
    fs: &impl ProjectFs,
    templates: &impl TemplateRenderer,
    reporter: &impl ProgressReporter,
    layout: &ProjectLayout,
    name: &str,
    language: Language,
) -> Result<WorkflowUpdate> {
    validate_harness_name(name)?;
    let vars = [
        ("harness_name", name),
        ("project_name", layout.project_name()),
    ];

    reporter.step("Adding harness source file");
    let harness_path = layout.harness_file(name, language.harness_extension());
    write_template(fs, templates, &harness_path, &language.harness_template(), &vars)?;
    reporter.success(&format!("Wrote {}", harness_path.display()));

    if language.uses_cargo() {
        reporter.step("Adding bin build target to Cargo.toml");
        append_template(
            fs,
            templates,
            &layout.fuzz_manifest(),
            "cargo_toml_bin_build",
            &vars,
        )?;
        reporter.success(&format!("Updated {}", layout.fuzz_manifest().display()));
    }

    reporter.step("Adding Mayhemfile");
    fs.create_dir_all(&layout.mayhemfiles_dir())?;
    write_template(
        fs,
        templates,
        &layout.mayhemfile(name),
        &language.mayhemfile_template(),
        &vars,
    )?;
    reporter.success(&format!("Wrote {}", layout.mayhemfile(name).display()));

    reporter.step("Adding entry to mayhem.yml");
    let update = update_workflow(fs, layout, &WorkflowTarget::default(), name);
    match &update {
        WorkflowUpdate::Appended => {
            reporter.success(&format!("Updated {}", layout.workflow_file().display()));
        }
        WorkflowUpdate::ManualEditRequired { reason, .. } => {
            reporter.warn(&format!(
                "Unable to update {} ({reason}). You must add this entry manually.",
                layout.workflow_file().display()
            ));
        }
    }

    reporter.step("Modifying Dockerfile");
    append_template(
        fs,
        templates,
        &layout.dockerfile(),
        &language.dockerfile_copy_template(),
        &vars,
    )?;
    reporter.success(&format!("Updated {}", layout.dockerfile().display()));

    Ok(update)
}

/// Append the harness Mayhemfile to the workflow matrix.
///
/// Never fails: every problem becomes [`WorkflowUpdate::ManualEditRequired`].
pub fn update_workflow(
    fs: &impl ProjectFs,
    layout: &ProjectLayout,
    target: &WorkflowTarget,
    name: &str,
) -> WorkflowUpdate {
    let entry = mayhemfile_entry(name);
    let path = layout.workflow_file();
    let manual = |reason: String| WorkflowUpdate::ManualEditRequired {
        reason,
        key_path: target.dotted(),
        entry: entry.clone(),
    };

    let source = match fs.read_to_string(&path) {
        Ok(s) => s,
        Err(e) => return manual(format!("{e:#}")),
    };
    let updated = match workflow::append_entry(&source, target, &entry) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "workflow edit failed");
            return manual(e.to_string());
        }
    };
    match fs.write(&path, &updated) {
        Ok(()) => WorkflowUpdate::Appended,
        Err(e) => manual(format!("{e:#}")),
    }
}
