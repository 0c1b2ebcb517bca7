//! Integration tests for `fuzzrig config` and `fuzzrig create-config`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::fuzzrig;

#[test]
fn test_create_config_writes_template() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let config = dir.path().join("fuzzrig").join("config.yaml");

    fuzzrig()
        .env("FUZZRIG_CONFIG", &config)
        .arg("create-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created settings"));

    let content = std::fs::read_to_string(&config).expect("read");
    assert!(content.contains("api_key"));
}

#[test]
fn test_create_config_keeps_existing_file() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "vultr:\n  api_key: KEEPME123456\n").expect("seed");

    fuzzrig()
        .env("FUZZRIG_CONFIG", &config)
        .arg("create-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));

    assert!(
        std::fs::read_to_string(&config)
            .expect("read")
            .contains("KEEPME123456")
    );
}

#[test]
fn test_config_set_then_show_masks_token() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let config = dir.path().join("config.yaml");

    fuzzrig()
        .env("FUZZRIG_CONFIG", &config)
        .args(["config", "set", "vultr.api_key", "ABCD1234EFGH5678"])
        .assert()
        .success();

    fuzzrig()
        .env("FUZZRIG_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABCD…5678"))
        .stdout(predicate::str::contains("ABCD1234EFGH5678").not());
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    fuzzrig()
        .env("FUZZRIG_CONFIG", dir.path().join("config.yaml"))
        .args(["config", "set", "vultr.region", "lax"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn test_config_show_without_file_reports_not_set() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    fuzzrig()
        .env("FUZZRIG_CONFIG", dir.path().join("config.yaml"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}
