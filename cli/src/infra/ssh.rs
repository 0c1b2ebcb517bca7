//! Local SSH state: `~/.ssh/config` host aliases, the known-hosts file used
//! for environment instances, and the identity key uploaded to the provider.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::application::ports::HostAliasStore;
use crate::domain::ssh::{NAME_PREFIX, host_block, replace_host_block};

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

// ── SshConfigManager ─────────────────────────────────────────────────────────

/// Manages host blocks in the user's `~/.ssh/config`.
pub struct SshConfigManager {
    path: PathBuf,
}

impl SshConfigManager {
    /// Creates a manager pointing at `~/.ssh/config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(home_dir()?.join(".ssh").join("config")))
    }

    /// Creates a manager pointing at an arbitrary path (for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the managed file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))
    }
}

impl HostAliasStore for SshConfigManager {
    fn register(&self, alias: &str, address: &str, identity_file: &str) -> Result<()> {
        let current = self.read()?;
        let updated = replace_host_block(&current, alias, &host_block(alias, address, identity_file));
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
            set_permissions(parent, 0o700)?;
        }
        std::fs::write(&self.path, updated)
            .with_context(|| format!("write {}", self.path.display()))?;
        set_permissions(&self.path, 0o600)?;
        tracing::debug!(alias, address, path = %self.path.display(), "registered host alias");
        Ok(())
    }
}

// ── KnownHostsManager ────────────────────────────────────────────────────────

/// Manages `~/.fuzzrig/known_hosts`, the host-key store used for every
/// environment connection.
pub struct KnownHostsManager {
    path: PathBuf,
}

impl KnownHostsManager {
    /// Creates a manager pointing at `~/.fuzzrig/known_hosts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(
            home_dir()?.join(format!(".{NAME_PREFIX}")).join("known_hosts"),
        ))
    }

    /// Creates a manager pointing at an arbitrary path (for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the managed file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file and its parent directory if missing.
    ///
    /// Sets file permissions to 600 and parent directory to 700 on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or permissions cannot be set.
    pub fn ensure(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
            set_permissions(parent, 0o700)?;
        }
        if !self.path.exists() {
            std::fs::write(&self.path, "")
                .with_context(|| format!("write {}", self.path.display()))?;
        }
        set_permissions(&self.path, 0o600)
    }

    /// Drops every entry recorded for `host`.
    ///
    /// Providers recycle addresses, so a fresh instance may reuse an address
    /// whose old key is still on file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be rewritten.
    pub fn forget(&self, host: &str) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let (kept, removed) = without_host(&content, host);
        if removed > 0 {
            std::fs::write(&self.path, kept)
                .with_context(|| format!("write {}", self.path.display()))?;
        }
        Ok(removed)
    }
}

/// Returns `content` without lines whose host field names `host`.
fn without_host(content: &str, host: &str) -> (String, usize) {
    let bracketed = format!("[{host}]");
    let mut removed = 0;
    let mut kept = String::with_capacity(content.len());
    for line in content.lines() {
        let hosts = line.split_whitespace().next().unwrap_or_default();
        let matches = hosts.split(',').any(|h| {
            h == host || h.strip_prefix(bracketed.as_str()).is_some_and(|rest| rest.starts_with(':'))
        });
        if matches {
            removed += 1;
        } else {
            kept.push_str(line);
            kept.push('\n');
        }
    }
    (kept, removed)
}

// ── Identity key ─────────────────────────────────────────────────────────────

/// The local key pair used to reach environment instances.
#[derive(Debug, Clone)]
pub struct IdentityKey {
    /// Private key path, as written into `IdentityFile`.
    pub private_path: PathBuf,
    /// Contents of the `.pub` file.
    pub public_key: String,
}

/// Returns the key pair at `~/.ssh/fuzzrig`, generating it if missing.
///
/// # Errors
///
/// Returns an error if `ssh-keygen` cannot be run or the public key cannot be read.
pub fn ensure_identity_key() -> Result<IdentityKey> {
    ensure_identity_key_at(&home_dir()?.join(".ssh").join(NAME_PREFIX))
}

/// Returns the key pair at `private_path`, generating it if missing.
///
/// # Errors
///
/// Returns an error if `ssh-keygen` cannot be run or the public key cannot be read.
pub fn ensure_identity_key_at(private_path: &Path) -> Result<IdentityKey> {
    let public_path = private_path.with_extension("pub");
    if !private_path.exists() || !public_path.exists() {
        if let Some(parent) = private_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
            set_permissions(parent, 0o700)?;
        }
        tracing::info!(path = %private_path.display(), "generating ssh key");
        let output = Command::new("ssh-keygen")
            .args(["-q", "-t", "rsa", "-b", "4096", "-N", "", "-C", NAME_PREFIX, "-f"])
            .arg(private_path)
            .output()
            .context("failed to run ssh-keygen")?;
        anyhow::ensure!(
            output.status.success(),
            "ssh-keygen failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let public_key = std::fs::read_to_string(&public_path)
        .with_context(|| format!("read {}", public_path.display()))?;
    Ok(IdentityKey {
        private_path: private_path.to_path_buf(),
        public_key,
    })
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
