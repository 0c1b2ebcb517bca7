//! Integration tests for `fuzzrig init` and `fuzzrig add-harness` inside a
//! freshly initialised git repository.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use predicates::prelude::*;

use crate::cli_tests::fuzzrig;

fn repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let root = dir.path().join("acme");
    git2::Repository::init(&root).expect("git init");
    (dir, root)
}

fn init(root: &Path, language: &str) {
    fuzzrig()
        .current_dir(root)
        .args(["--yes", "init", "--language", language])
        .assert()
        .success();
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn test_init_outside_repository_fails() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    fuzzrig()
        .current_dir(dir.path())
        .args(["--yes", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside a git repository"));
}

#[test]
fn test_init_under_ci_without_yes_keeps_default_and_cancels() {
    let (_dir, root) = repo();
    fuzzrig()
        .current_dir(&root)
        .env("CI", "true")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("init cancelled"));

    assert!(!root.join("fuzz").exists());
    assert!(!root.join(".github").exists());
}

#[test]
fn test_init_with_fuzzrig_yes_env_proceeds() {
    let (_dir, root) = repo();
    fuzzrig()
        .current_dir(&root)
        .env("CI", "true")
        .env("FUZZRIG_YES", "1")
        .arg("init")
        .assert()
        .success();

    assert!(root.join("fuzz/Dockerfile").exists());
}

#[test]
fn test_init_rust_creates_scaffold() {
    let (_dir, root) = repo();
    init(&root, "rust");

    assert!(read(root.join(".github/workflows/mayhem.yml")).contains("mayhemfile: []"));
    assert!(read(root.join("fuzz/Cargo.toml")).contains("acme-fuzz"));
    assert!(root.join("fuzz/.gitignore").exists());
    assert!(root.join("fuzz/Dockerfile").exists());
    assert!(root.join("fuzz/mayhemfiles").is_dir());
    assert!(root.join("fuzz/fuzz_targets").is_dir());
}

#[test]
fn test_init_from_subdirectory_targets_repository_root() {
    let (_dir, root) = repo();
    let nested = root.join("src");
    std::fs::create_dir_all(&nested).expect("mkdir");
    init(&nested, "python");

    assert!(root.join("fuzz/Dockerfile").exists());
    assert!(!root.join("fuzz/Cargo.toml").exists());
    assert!(!nested.join("fuzz").exists());
}

#[test]
fn test_add_harness_registers_in_workflow() {
    let (_dir, root) = repo();
    init(&root, "rust");

    fuzzrig()
        .current_dir(&root)
        .args(["add-harness", "parse_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harness parse_url added"));

    assert!(root.join("fuzz/fuzz_targets/parse_url.rs").exists());
    assert!(read(root.join("fuzz/Cargo.toml")).contains("name = \"parse_url\""));
    assert!(read(root.join("fuzz/mayhemfiles/Mayhemfile_parse_url")).contains("parse_url"));
    assert!(read(root.join("fuzz/Dockerfile")).contains("/fuzz/parse_url"));

    let workflow: serde_yaml::Value =
        serde_yaml::from_str(&read(root.join(".github/workflows/mayhem.yml"))).expect("yaml");
    let list = &workflow["jobs"]["mayhem"]["strategy"]["matrix"]["mayhemfile"];
    assert_eq!(
        list.as_sequence().expect("list").len(),
        1,
        "exactly one entry appended"
    );
    assert_eq!(list[0].as_str(), Some("fuzz/mayhemfiles/Mayhemfile_parse_url"));
}

#[test]
fn test_add_harness_rejects_non_snake_case() {
    let (_dir, root) = repo();
    init(&root, "rust");

    fuzzrig()
        .current_dir(&root)
        .args(["add-harness", "ParseUrl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ParseUrl"));

    assert!(!root.join("fuzz/fuzz_targets/ParseUrl.rs").exists());
}

#[test]
fn test_add_harness_with_broken_workflow_prints_manual_entry() {
    let (_dir, root) = repo();
    init(&root, "rust");
    std::fs::write(root.join(".github/workflows/mayhem.yml"), "jobs: [oops\n").expect("corrupt");

    fuzzrig()
        .current_dir(&root)
        .args(["add-harness", "decode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jobs.mayhem.strategy.matrix.mayhemfile"))
        .stdout(predicate::str::contains("- fuzz/mayhemfiles/Mayhemfile_decode"));

    assert!(root.join("fuzz/fuzz_targets/decode.rs").exists());
}
