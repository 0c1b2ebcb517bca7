//! Git remote URL parsing (owner and repository name).

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ProvisionError;
use crate::domain::ssh::NAME_PREFIX;

// Owner and name end up in an ssh_config `Host` line, so they are limited to
// characters that form a single token there.
#[allow(clippy::expect_used)] // compile-time constant patterns
static URL_FORMS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        // https://host/owner/name(.git), ssh://git@host(:port)/owner/name(.git)
        Regex::new(
            r"^(?:https?|ssh|git)://(?:[^@/\s]+@)?[^/:\s]+(?::\d+)?/(?:[^/\s]+/)*?([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+?)(?:\.git)?/?$",
        )
        .expect("valid regex"),
        // git@host:owner/name(.git)
        Regex::new(
            r"^[^@/\s]+@[^:/\s]+:(?:[^/\s]+/)*?([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+?)(?:\.git)?/?$",
        )
        .expect("valid regex"),
    ]
});

/// Owner and name of a hosted git repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    pub url: String,
    pub owner: String,
    pub name: String,
}

impl RepoUrl {
    /// Parses an https, ssh, or scp-like git URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::InvalidRepoUrl`] if no owner/name pair can
    /// be extracted.
    pub fn parse(url: &str) -> Result<Self, ProvisionError> {
        let trimmed = url.trim();
        URL_FORMS
            .iter()
            .find_map(|re| re.captures(trimmed))
            .map(|caps| Self {
                url: trimmed.to_string(),
                owner: caps[1].to_string(),
                name: caps[2].to_string(),
            })
            .ok_or_else(|| ProvisionError::InvalidRepoUrl(url.to_string()))
    }

    /// Instance label and `~/.ssh/config` alias: `fuzzrig-<owner>-<name>`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{NAME_PREFIX}-{}-{}", self.owner, self.name)
    }
}
