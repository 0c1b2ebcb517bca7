//! Harness naming and per-language template selection.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::HarnessError;

#[allow(clippy::expect_used)] // compile-time constant pattern
static SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:_[a-z0-9]+)*$").expect("valid regex"));

/// Fuzzing toolchain of the target project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Language {
    /// cargo-fuzz / libFuzzer
    #[default]
    Rust,
    /// Atheris
    Python,
}

impl Language {
    /// Lowercase name used in template file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
        }
    }

    /// File extension of a harness source file.
    #[must_use]
    pub fn harness_extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Python => "py",
        }
    }

    /// Whether harnesses are registered as `[[bin]]` targets in `fuzz/Cargo.toml`.
    #[must_use]
    pub fn uses_cargo(self) -> bool {
        matches!(self, Self::Rust)
    }

    #[must_use]
    pub fn dockerfile_template(self) -> String {
        format!("Dockerfile_{}", self.as_str())
    }

    #[must_use]
    pub fn harness_template(self) -> String {
        format!("harness.{}", self.harness_extension())
    }

    #[must_use]
    pub fn mayhemfile_template(self) -> String {
        format!("Mayhemfile_{}", self.as_str())
    }

    #[must_use]
    pub fn dockerfile_copy_template(self) -> String {
        format!("dockerfile_copy_{}", self.as_str())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `name` is lowercase snake case (`parse_header`, `v2`).
#[must_use]
pub fn is_snake_case(name: &str) -> bool {
    SNAKE_CASE.is_match(name)
}

/// Validates a harness name.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidName`] if the name is not snake case.
pub fn validate_harness_name(name: &str) -> Result<(), HarnessError> {
    if is_snake_case(name) {
        Ok(())
    } else {
        Err(HarnessError::InvalidName(name.to_string()))
    }
}
