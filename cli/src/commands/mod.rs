//! Command implementations

pub mod add_harness;
pub mod config;
pub mod init;
pub mod launch;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::ProjectLayout;
use crate::infra::repo::discover_project;

/// Layout of the repository containing the current directory.
pub(crate) fn current_project() -> Result<ProjectLayout> {
    let cwd: PathBuf = std::env::current_dir().context("cannot determine current directory")?;
    discover_project(&cwd)
}
