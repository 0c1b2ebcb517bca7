//! Target repository layout.

use std::path::{Path, PathBuf};

/// Paths of the fuzzing scaffold inside a target repository.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    name: String,
}

impl ProjectLayout {
    /// `name` is the project name used in rendered templates, normally the
    /// repository directory's basename.
    #[must_use]
    pub fn new(root: PathBuf, name: impl Into<String>) -> Self {
        Self {
            root,
            name: name.into(),
        }
    }

    /// Layout whose project name is the basename of `root`.
    #[must_use]
    pub fn from_root(root: PathBuf) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(root, name)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join(".github").join("workflows")
    }

    #[must_use]
    pub fn workflow_file(&self) -> PathBuf {
        self.workflows_dir().join("mayhem.yml")
    }

    #[must_use]
    pub fn fuzz_dir(&self) -> PathBuf {
        self.root.join("fuzz")
    }

    #[must_use]
    pub fn fuzz_targets_dir(&self) -> PathBuf {
        self.fuzz_dir().join("fuzz_targets")
    }

    #[must_use]
    pub fn mayhemfiles_dir(&self) -> PathBuf {
        self.fuzz_dir().join("mayhemfiles")
    }

    #[must_use]
    pub fn fuzz_manifest(&self) -> PathBuf {
        self.fuzz_dir().join("Cargo.toml")
    }

    #[must_use]
    pub fn dockerfile(&self) -> PathBuf {
        self.fuzz_dir().join("Dockerfile")
    }

    #[must_use]
    pub fn gitignore(&self) -> PathBuf {
        self.fuzz_dir().join(".gitignore")
    }

    #[must_use]
    pub fn harness_file(&self, harness: &str, extension: &str) -> PathBuf {
        self.fuzz_targets_dir().join(format!("{harness}.{extension}"))
    }

    #[must_use]
    pub fn mayhemfile(&self, harness: &str) -> PathBuf {
        self.mayhemfiles_dir().join(format!("Mayhemfile_{harness}"))
    }
}
