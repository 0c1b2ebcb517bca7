//! Application service — `fuzzrig init` scaffolding.
//!
//! Copies the workflow, fuzz manifest, ignore file and Dockerfile templates
//! into a repository. Files are written one after another with no rollback;
//! a failure part-way leaves the earlier files in place.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ProjectFs, TemplateRenderer};
use crate::domain::{Language, ProjectLayout};

/// Write the fuzzing scaffold for `language` into `layout`.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created, or a template
/// fails to render.
pub fn init_project(
    fs: &impl ProjectFs,
    templates: &impl TemplateRenderer,
    reporter: &impl ProgressReporter,
    layout: &ProjectLayout,
    language: Language,
) -> Result<()> {
    let vars = [("project_name", layout.project_name())];

    reporter.step("Initializing Mayhem GitHub Action");
    fs.create_dir_all(&layout.workflows_dir())?;
    write_template(fs, templates, &layout.workflow_file(), "mayhem.yml", &vars)?;
    reporter.success(&format!("Wrote {}", layout.workflow_file().display()));

    reporter.step("Initializing fuzz folder");
    fs.create_dir_all(&layout.fuzz_targets_dir())?;
    if language.uses_cargo() {
        write_template(fs, templates, &layout.fuzz_manifest(), "fuzz_cargo_toml", &vars)?;
        reporter.success(&format!("Wrote {}", layout.fuzz_manifest().display()));
    }
    write_template(fs, templates, &layout.gitignore(), "gitignore", &vars)?;
    reporter.success(&format!("Wrote {}", layout.gitignore().display()));

    reporter.step("Initializing Mayhemfiles folder");
    fs.create_dir_all(&layout.mayhemfiles_dir())?;
    reporter.success(&format!("Created {}", layout.mayhemfiles_dir().display()));

    reporter.step("Initializing Dockerfile");
    write_template(
        fs,
        templates,
        &layout.dockerfile(),
        &language.dockerfile_template(),
        &vars,
    )?;
    reporter.success(&format!("Wrote {}", layout.dockerfile().display()));

    Ok(())
}

/// Overwrite the VS Code server machine settings at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_vscode_settings(
    fs: &impl ProjectFs,
    templates: &impl TemplateRenderer,
    reporter: &impl ProgressReporter,
    path: &Path,
    layout: &ProjectLayout,
) -> Result<()> {
    reporter.step("Overwriting VS Code settings");
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
    }
    write_template(
        fs,
        templates,
        path,
        "settings.json",
        &[("project_name", layout.project_name())],
    )?;
    reporter.success(&format!("Wrote {}", path.display()));
    Ok(())
}

pub(crate) fn write_template(
    fs: &impl ProjectFs,
    templates: &impl TemplateRenderer,
    path: &Path,
    template: &str,
    vars: &[(&str, &str)],
) -> Result<()> {
    let content = templates.render(template, vars)?;
    fs.write(path, &content)
        .with_context(|| format!("writing {template} to {}", path.display()))
}

pub(crate) fn append_template(
    fs: &impl ProjectFs,
    templates: &impl TemplateRenderer,
    path: &Path,
    template: &str,
    vars: &[(&str, &str)],
) -> Result<()> {
    let content = templates.render(template, vars)?;
    fs.append(path, &content)
        .with_context(|| format!("appending {template} to {}", path.display()))
}
