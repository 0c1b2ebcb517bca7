//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration keys, values and credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error(
        "Vultr API key is not set.\n\nSet it with: fuzzrig config set vultr.api_key <token>\nConfig file: {path}"
    )]
    MissingCredential { path: String },
}

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Errors raised while editing the CI workflow document.
///
/// Callers downgrade these to a warning plus manual-edit instructions.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow is not valid YAML: {0}")]
    Parse(String),

    #[error("workflow has no '{key}' key")]
    Path { key: String },

    #[error("workflow key '{key}' is not a list")]
    NotASequence { key: String },
}

// ── Cloud errors ──────────────────────────────────────────────────────────────

/// Errors returned by the cloud compute API and the address wait.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("Vultr API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Vultr API request failed: {0}")]
    Transport(String),

    #[error("unexpected Vultr API response: {0}")]
    Decode(String),

    #[error("Instance took too long to start (no address after {}s)", .elapsed.as_secs())]
    AddressTimeout { elapsed: Duration },
}

// ── Remote shell errors ───────────────────────────────────────────────────────

/// Errors raised by the remote executor.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Unable to connect to SSH after {} seconds.", .elapsed.as_secs())]
    ConnectionTimeout { elapsed: Duration },

    #[error("remote command exited with status {status}")]
    CommandFailed { status: i32 },
}

// ── Harness errors ────────────────────────────────────────────────────────────

/// Errors related to harness naming.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid harness name '{0}': name must be in snake case (e.g. parse_header)")]
    InvalidName(String),
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors raised by the dev-environment flow outside of API calls.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Aborted: existing dev environment '{label}' was kept.")]
    Declined { label: String },

    #[error("Invalid repo argument '{0}'. Please use an https or ssh URL.")]
    InvalidRepoUrl(String),
}
