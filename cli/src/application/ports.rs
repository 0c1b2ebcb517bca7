//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{CloudError, FuzzrigConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Address reported by the provider until an instance has finished booting.
pub const PLACEHOLDER_ADDRESS: &str = "0.0.0.0";

// ── Value Types ───────────────────────────────────────────────────────────────

/// A compute instance as observed through the provider API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInstance {
    pub id: String,
    pub label: String,
    /// Provider lifecycle state, e.g. `"pending"` or `"active"`.
    pub status: String,
    /// Public IPv4, or [`PLACEHOLDER_ADDRESS`] while unassigned.
    pub main_ip: String,
}

impl RemoteInstance {
    /// Returns the address once it is no longer the placeholder.
    #[must_use]
    pub fn assigned_address(&self) -> Option<&str> {
        let ip = self.main_ip.trim();
        (!ip.is_empty() && ip != PLACEHOLDER_ADDRESS).then_some(ip)
    }
}

/// An SSH public key registered with the provider account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKeyRecord {
    pub id: String,
    pub name: String,
}

/// Creation parameters for a new instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec<'a> {
    /// Region code, e.g. `"lax"`.
    pub region: &'a str,
    /// Plan (machine size), e.g. `"vc2-4c-8gb"`.
    pub plan: &'a str,
    /// Operating system image id.
    pub os_id: u32,
    pub label: &'a str,
    /// Keys installed for `root`.
    pub ssh_key_ids: Vec<String>,
    pub backups: bool,
}

// ── Cloud API Port ────────────────────────────────────────────────────────────

/// Calls against the cloud compute API.
///
/// Every method maps a non-success HTTP status to [`CloudError::Api`]; there
/// is no silent continuation.
pub trait CloudApi {
    /// List all instances on the account.
    fn list_instances(&self) -> Result<Vec<RemoteInstance>, CloudError>;
    /// Fetch one instance.
    fn get_instance(&self, id: &str) -> Result<RemoteInstance, CloudError>;
    /// Create an instance and return it as first reported.
    fn create_instance(&self, spec: &InstanceSpec<'_>) -> Result<RemoteInstance, CloudError>;
    /// Delete an instance.
    fn delete_instance(&self, id: &str) -> Result<(), CloudError>;
    /// List all SSH keys on the account.
    fn list_ssh_keys(&self) -> Result<Vec<SshKeyRecord>, CloudError>;
    /// Upload a public key under `name`.
    fn create_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKeyRecord, CloudError>;
    /// Delete an SSH key.
    fn delete_ssh_key(&self, id: &str) -> Result<(), CloudError>;
}

// ── Remote Shell Ports ────────────────────────────────────────────────────────

/// Opens authenticated shell sessions to a remote host.
pub trait RemoteConnector {
    type Session: RemoteSession;

    /// Make a single connection attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is unreachable or refuses authentication.
    fn connect(&self, host: &str) -> Result<Self::Session>;
}

/// An open remote shell session.
///
/// Implementations release the underlying connection exactly once: on
/// [`RemoteSession::close`], or on drop if `close` was never called.
pub trait RemoteSession {
    /// Run `command`, streaming merged stdout/stderr into `out` as it arrives.
    /// Blocks until the remote process exits and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or output cannot be
    /// forwarded.
    fn run(&mut self, command: &str, out: &mut dyn Write) -> Result<i32>;

    /// Release the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection could not be shut down cleanly.
    fn close(self) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts the settings file.
pub trait ConfigStore {
    /// Load the settings, returning defaults if the file does not exist.
    fn load(&self) -> Result<FuzzrigConfig>;
    /// Load the settings, first writing the default template if the file
    /// does not exist.
    fn load_or_init(&self) -> Result<FuzzrigConfig>;
    /// Persist the settings.
    fn save(&self, config: &FuzzrigConfig) -> Result<()>;
    /// Location of the settings file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Template and Filesystem Ports ─────────────────────────────────────────────

/// Renders named templates with `{{ var }}` substitutions.
pub trait TemplateRenderer {
    /// Render template `name` with `vars`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist or a placeholder has
    /// no value.
    fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String>;
}

/// Filesystem operations on the target repository.
pub trait ProjectFs {
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Create or truncate `path` and write `contents`.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
    /// Append `contents` to `path`, creating it if missing.
    fn append(&self, path: &Path, contents: &str) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

// ── SSH Configuration Port ────────────────────────────────────────────────────

/// Local host-alias configuration (`~/.ssh/config`).
pub trait HostAliasStore {
    /// Replace any block for `alias` with one pointing at `address`.
    fn register(&self, alias: &str, address: &str, identity_file: &str) -> Result<()>;
}
