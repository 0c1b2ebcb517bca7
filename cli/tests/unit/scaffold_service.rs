//! Tests for `init` scaffolding and `add-harness` against an in-memory filesystem.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use fuzzrig_cli::application::services::harness::{self, WorkflowUpdate};
use fuzzrig_cli::application::services::scaffold;
use fuzzrig_cli::domain::workflow::entries;
use fuzzrig_cli::domain::{HarnessError, Language, ProjectLayout, WorkflowTarget};
use fuzzrig_cli::infra::templates::EmbeddedTemplates;

use crate::mocks::{MemoryFs, RecordingReporter};

fn layout() -> ProjectLayout {
    ProjectLayout::from_root(PathBuf::from("/work/acme"))
}

fn initialised(language: Language) -> MemoryFs {
    let fs = MemoryFs::new();
    let reporter = RecordingReporter::default();
    scaffold::init_project(&fs, &EmbeddedTemplates, &reporter, &layout(), language)
        .expect("init");
    fs
}

fn workflow_entries(fs: &MemoryFs) -> Vec<String> {
    let source = fs.read(&layout().workflow_file()).expect("workflow written");
    entries(&source, &WorkflowTarget::default()).expect("entries")
}

// ── init ─────────────────────────────────────────────────────────────────────

#[test]
fn test_init_rust_writes_all_scaffold_files() {
    let fs = initialised(Language::Rust);
    let l = layout();

    assert!(fs.read(&l.workflow_file()).is_some());
    assert!(fs.read(&l.gitignore()).is_some());
    let manifest = fs.read(&l.fuzz_manifest()).expect("Cargo.toml");
    assert!(manifest.contains("acme"));
    assert!(fs.read(&l.dockerfile()).expect("Dockerfile").contains("cargo"));
    assert!(fs.dirs.borrow().contains(&l.mayhemfiles_dir()));
    assert!(workflow_entries(&fs).is_empty());
}

#[test]
fn test_init_python_skips_cargo_manifest() {
    let fs = initialised(Language::Python);
    let l = layout();

    assert!(fs.read(&l.fuzz_manifest()).is_none());
    assert!(fs.read(&l.dockerfile()).expect("Dockerfile").contains("atheris"));
}

#[test]
fn test_vscode_settings_written_with_project_name() {
    let fs = MemoryFs::new();
    let reporter = RecordingReporter::default();
    let path = PathBuf::from("/home/u/.vscode-server/data/Machine/settings.json");

    scaffold::write_vscode_settings(&fs, &EmbeddedTemplates, &reporter, &path, &layout())
        .expect("settings");

    let content = fs.read(&path).expect("written");
    assert!(content.contains("/root/acme/fuzz/Cargo.toml"));
    assert!(fs.dirs.borrow().contains(&path.parent().expect("parent").to_path_buf()));
}

// ── add-harness ──────────────────────────────────────────────────────────────

#[test]
fn test_add_rust_harness_updates_every_file() {
    let fs = initialised(Language::Rust);
    let reporter = RecordingReporter::default();
    let l = layout();

    let update = harness::add_harness(
        &fs,
        &EmbeddedTemplates,
        &reporter,
        &l,
        "parse_url",
        Language::Rust,
    )
    .expect("add");

    assert_eq!(update, WorkflowUpdate::Appended);
    assert!(
        fs.read(&l.harness_file("parse_url", "rs"))
            .expect("harness")
            .contains("fuzz_target!")
    );
    assert!(
        fs.read(&l.fuzz_manifest())
            .expect("manifest")
            .contains("name = \"parse_url\"")
    );
    assert!(
        fs.read(&l.mayhemfile("parse_url"))
            .expect("mayhemfile")
            .contains("target: parse_url")
    );
    assert!(fs.read(&l.dockerfile()).expect("Dockerfile").contains("/fuzz/parse_url"));
    assert_eq!(
        workflow_entries(&fs),
        vec!["fuzz/mayhemfiles/Mayhemfile_parse_url"]
    );
}

#[test]
fn test_add_python_harness_leaves_manifest_alone() {
    let fs = initialised(Language::Python);
    let reporter = RecordingReporter::default();
    let l = layout();

    harness::add_harness(&fs, &EmbeddedTemplates, &reporter, &l, "decode", Language::Python)
        .expect("add");

    assert!(fs.read(&l.harness_file("decode", "py")).is_some());
    assert!(fs.read(&l.fuzz_manifest()).is_none());
}

#[test]
fn test_add_two_harnesses_keeps_order() {
    let fs = initialised(Language::Rust);
    let reporter = RecordingReporter::default();
    for name in ["first", "second"] {
        harness::add_harness(&fs, &EmbeddedTemplates, &reporter, &layout(), name, Language::Rust)
            .expect("add");
    }
    assert_eq!(
        workflow_entries(&fs),
        vec![
            "fuzz/mayhemfiles/Mayhemfile_first",
            "fuzz/mayhemfiles/Mayhemfile_second",
        ]
    );
}

#[test]
fn test_invalid_harness_name_writes_nothing() {
    let fs = initialised(Language::Rust);
    let before = fs.files.borrow().clone();
    let reporter = RecordingReporter::default();

    let err = harness::add_harness(
        &fs,
        &EmbeddedTemplates,
        &reporter,
        &layout(),
        "ParseUrl",
        Language::Rust,
    )
    .expect_err("invalid");

    assert!(matches!(
        err.downcast_ref::<HarnessError>(),
        Some(HarnessError::InvalidName(_))
    ));
    assert_eq!(*fs.files.borrow(), before);
}

#[test]
fn test_unparseable_workflow_downgrades_to_manual_edit() {
    let fs = initialised(Language::Rust);
    fs.seed(&layout().workflow_file(), "jobs: [unclosed\n");
    let reporter = RecordingReporter::default();

    let update = harness::add_harness(
        &fs,
        &EmbeddedTemplates,
        &reporter,
        &layout(),
        "parse_url",
        Language::Rust,
    )
    .expect("other steps still succeed");

    match update {
        WorkflowUpdate::ManualEditRequired { key_path, entry, .. } => {
            assert_eq!(key_path, "jobs.mayhem.strategy.matrix.mayhemfile");
            assert_eq!(entry, "fuzz/mayhemfiles/Mayhemfile_parse_url");
        }
        WorkflowUpdate::Appended => panic!("expected manual edit"),
    }
    assert_eq!(reporter.warnings().len(), 1);
    assert!(fs.read(&layout().dockerfile()).expect("Dockerfile").contains("parse_url"));
}

#[test]
fn test_missing_workflow_downgrades_to_manual_edit() {
    let fs = MemoryFs::new();
    let update = harness::update_workflow(&fs, &layout(), &WorkflowTarget::default(), "x");
    assert!(matches!(update, WorkflowUpdate::ManualEditRequired { .. }));
}

#[test]
fn test_workflow_without_matrix_list_downgrades_to_manual_edit() {
    let fs = MemoryFs::new();
    fs.seed(&layout().workflow_file(), "name: ci\njobs:\n  build:\n    runs-on: x\n");
    let update = harness::update_workflow(&fs, &layout(), &WorkflowTarget::default(), "x");
    match update {
        WorkflowUpdate::ManualEditRequired { reason, .. } => assert!(reason.contains("mayhem")),
        WorkflowUpdate::Appended => panic!("expected manual edit"),
    }
}
