//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod git_url;
pub mod harness;
pub mod project;
pub mod retry;
pub mod ssh;
pub mod workflow;

pub use config::{FuzzrigConfig, VultrConfig, validate_config_key, validate_config_value};
pub use error::{
    CloudError, ConfigError, HarnessError, ProvisionError, RemoteError, WorkflowError,
};
pub use git_url::RepoUrl;
pub use harness::{Language, validate_harness_name};
pub use project::ProjectLayout;
pub use retry::{Attempt, Clock, RetryError, RetryPolicy};
pub use workflow::WorkflowTarget;
