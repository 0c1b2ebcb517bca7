//! Target repository discovery.

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

use crate::domain::ProjectLayout;

/// Find the git repository containing `start` and return its scaffold layout.
///
/// # Errors
///
/// Returns an error if `start` is not inside a git repository or the
/// repository has no working directory.
pub fn discover_project(start: &Path) -> Result<ProjectLayout> {
    let repo = Repository::discover(start).with_context(|| {
        format!(
            "{} is not inside a git repository.\n\nRun fuzzrig from your project's checkout.",
            start.display()
        )
    })?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow::anyhow!("bare repositories have no working directory to scaffold"))?;
    let root = workdir
        .canonicalize()
        .with_context(|| format!("resolving {}", workdir.display()))?;
    tracing::debug!(root = %root.display(), "discovered repository");
    Ok(ProjectLayout::from_root(root))
}
