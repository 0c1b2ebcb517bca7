//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls, process
//! execution, filesystem access, SSH management, and template embedding.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod clock;
pub mod config;
pub mod fs;
pub mod repo;
pub mod ssh;
pub mod ssh_session;
pub mod templates;
pub mod vultr;
