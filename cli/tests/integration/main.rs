//! Integration tests for fuzzrig CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach the network: every provisioning test fails before the
//! first API call.

mod config_command;
mod scaffold_commands;
