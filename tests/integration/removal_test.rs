//! Removal, validation gate and backup behavior

use super::support::{settings_for, write};
use pruner::core::{Pruner, SafetyRemover, Validator};
use pruner::models::config::Settings;
use pruner::models::removal::{FileOutcome, RemoveOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn confirmed() -> RemoveOptions {
    RemoveOptions {
        auto_confirm: true,
        ..RemoveOptions::default()
    }
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/old.ts", "console.log('old');\n");

    let mut pruner = Pruner::new(settings_for(root)).unwrap();
    let report = pruner
        .remove_unused_files(&RemoveOptions {
            dry_run: true,
            ..RemoveOptions::default()
        })
        .unwrap();

    assert!(report.success);
    assert!(report.dry_run);
    assert_eq!(report.details.would_remove, vec![PathBuf::from("src/old.ts")]);
    assert!(report.details.removed.is_empty());
    assert!(root.join("src/old.ts").is_file());
    assert!(!root.join(".cleanup-backup").exists());
}

#[test]
fn test_backup_round_trip() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/nested/old.ts", "console.log('old');\n");
    let file = Path::new("src/nested/old.ts");

    let mut remover = SafetyRemover::with_default_backup(root).unwrap();
    assert_eq!(remover.remove_file(file), FileOutcome::Done);
    assert!(!root.join(file).exists());
    assert_eq!(
        fs::read_to_string(root.join(".cleanup-backup/src/nested/old.ts")).unwrap(),
        "console.log('old');\n"
    );

    assert_eq!(remover.restore_file(file), FileOutcome::Done);
    assert_eq!(
        fs::read_to_string(root.join(file)).unwrap(),
        "console.log('old');\n"
    );

    match remover.restore_file(file) {
        FileOutcome::Failed(message) => assert!(message.starts_with("Backup not found")),
        FileOutcome::Done => panic!("second restore should fail"),
    }
}

#[test]
fn test_validation_rejects_candidates_still_imported() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "import { a } from './a';\nconsole.log(a);\n");
    write(root, "src/a.ts", "export const a = 1;\n");
    write(root, "src/z.ts", "console.log('z');\n");

    let validator = Validator::new(&settings_for(root)).unwrap();
    let candidates = vec![PathBuf::from("src/a.ts"), PathBuf::from("src/z.ts")];
    let validation = validator.validate_removal(&candidates).unwrap();

    assert!(!validation.is_valid);
    assert_eq!(validation.broken_references.len(), 1);
    let broken = &validation.broken_references[0];
    assert_eq!(broken.file, PathBuf::from("src/a.ts"));
    assert_eq!(broken.missing_import, "./a");
    assert_eq!(broken.imported_from, PathBuf::from("src/main.ts"));
}

#[test]
fn test_failed_gate_removes_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "scripts/seed.ts", "import '../src/helper';\n");
    write(root, "src/helper.ts", "console.log('helper');\n");
    write(root, "src/z.ts", "console.log('z');\n");

    let settings = Settings {
        reachability_only: true,
        protected_patterns: vec!["scripts/**".to_string()],
        ..settings_for(root)
    };
    let mut pruner = Pruner::new(settings).unwrap();
    let report = pruner.remove_unused_files(&confirmed()).unwrap();

    assert!(!report.success);
    assert!(report.details.removed.is_empty());
    assert_eq!(report.summary.total_removed, 0);
    assert_eq!(
        report.details.skipped,
        vec![PathBuf::from("src/helper.ts"), PathBuf::from("src/z.ts")]
    );
    let pre = report.pre_validation.unwrap();
    assert!(!pre.can_proceed);
    assert!(pre
        .recommendations
        .iter()
        .any(|r| r.contains("Keep src/helper.ts")));

    assert!(root.join("src/helper.ts").is_file());
    assert!(root.join("src/z.ts").is_file());
    assert!(root.join("scripts/seed.ts").is_file());
}

#[test]
fn test_protected_files_survive_removal() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{ "name": "demo" }"#);
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/index.css", "body {}\n");
    write(root, "src/keep.ts", "console.log('keep');\n");
    write(root, "src/old.ts", "console.log('old');\n");

    let settings = Settings {
        protected_patterns: vec!["src/keep.ts".to_string()],
        ..settings_for(root)
    };
    let mut pruner = Pruner::new(settings).unwrap();
    let report = pruner.remove_unused_files(&confirmed()).unwrap();

    assert!(report.success);
    assert_eq!(report.details.removed, vec![PathBuf::from("src/old.ts")]);
    for kept in ["package.json", "src/main.ts", "src/index.css", "src/keep.ts"] {
        assert!(root.join(kept).is_file(), "{kept}");
        assert!(!root.join(".cleanup-backup").join(kept).exists(), "{kept}");
    }
}

#[test]
fn test_exclude_patterns_and_review_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/legacy/old.ts", "console.log('old');\n");
    write(root, "src/helpers.ts", "export const help = 1;\n");
    write(root, "src/gone.ts", "console.log('gone');\n");

    let mut pruner = Pruner::new(settings_for(root)).unwrap();
    let report = pruner
        .remove_unused_files(&RemoveOptions {
            exclude_patterns: vec!["src/legacy/**".to_string()],
            ..confirmed()
        })
        .unwrap();

    assert!(report.success);
    assert_eq!(report.details.removed, vec![PathBuf::from("src/gone.ts")]);
    assert_eq!(report.details.skipped, vec![PathBuf::from("src/legacy/old.ts")]);
    assert_eq!(report.details.requires_review.len(), 1);
    assert_eq!(report.details.requires_review[0].file, PathBuf::from("src/helpers.ts"));
    assert!(root.join("src/helpers.ts").is_file());
    assert!(root.join("src/legacy/old.ts").is_file());
}

#[test]
fn test_dotted_backup_dir_is_never_rescanned() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/b.ts", "console.log('b');\n");

    let settings = Settings {
        backup_dir: PathBuf::from("./bk"),
        ..settings_for(root)
    };

    let mut first = Pruner::new(settings.clone()).unwrap();
    let report = first.remove_unused_files(&confirmed()).unwrap();
    assert_eq!(report.details.removed, vec![PathBuf::from("src/b.ts")]);
    assert!(root.join("bk/src/b.ts").is_file());

    let mut second = Pruner::new(settings).unwrap();
    let analysis = second.analyze_project().unwrap();
    assert!(analysis.unused_files.is_empty());
    assert!(analysis.files.iter().all(|f| !f.path.starts_with("bk")));

    let again = second.remove_unused_files(&confirmed()).unwrap();
    assert!(again.details.removed.is_empty());
    assert!(!root.join("bk/bk").exists());

    let rollback = second.rollback_removal();
    assert!(rollback.success);
    assert_eq!(rollback.restored, vec![PathBuf::from("src/b.ts")]);
    assert_eq!(
        fs::read_to_string(root.join("src/b.ts")).unwrap(),
        "console.log('b');\n"
    );
}
