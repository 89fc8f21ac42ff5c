//! Full analyze, remove, history and rollback cycle on a small project

use super::support::{settings_for, write};
use pruner::core::Pruner;
use pruner::models::removal::RemoveOptions;
use pruner::output::{create_formatter, Formatter};
use pruner::models::config::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn create_project(root: &Path) {
    write(
        root,
        "package.json",
        r#"{
            "name": "demo-app",
            "version": "1.0.0",
            "dependencies": { "react": "^18.2.0", "left-pad": "^1.3.0" }
        }"#,
    );
    write(
        root,
        "src/main.ts",
        "import React from 'react';\nimport { theme } from './a';\nconsole.log(React, theme);\n",
    );
    write(root, "src/a.ts", "export const theme = 'style.css';\n");
    write(root, "src/style.css", "body { margin: 0; }\n");
    write(root, "src/b.ts", "console.log('b');\n");
}

#[test]
fn test_analyze_remove_and_rollback() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    create_project(root);

    let mut pruner = Pruner::new(settings_for(root)).unwrap();

    let analysis = pruner.analyze_project().unwrap();
    assert_eq!(analysis.total_files, 5);
    assert_eq!(analysis.unused_files, vec![PathBuf::from("src/b.ts")]);
    assert_eq!(analysis.unused_dependencies, vec!["left-pad".to_string()]);

    let style = analysis.file(Path::new("src/style.css")).unwrap();
    assert!(style.is_used);
    assert_eq!(style.referenced_by, vec![PathBuf::from("src/a.ts")]);

    let react = analysis.dependencies.iter().find(|d| d.name == "react").unwrap();
    assert_eq!(react.usage_locations, vec![PathBuf::from("src/main.ts")]);

    let report = pruner
        .remove_unused_files(&RemoveOptions {
            auto_confirm: true,
            ..RemoveOptions::default()
        })
        .unwrap();
    assert!(report.success);
    assert_eq!(report.details.removed, vec![PathBuf::from("src/b.ts")]);
    assert_eq!(report.summary.total_removed, 1);
    assert_eq!(report.summary.space_saved, "console.log('b');\n".len() as u64);
    assert!(report.pre_validation.as_ref().unwrap().can_proceed);
    assert!(report.post_validation.as_ref().unwrap().is_healthy);

    assert!(!root.join("src/b.ts").exists());
    assert!(root.join(".cleanup-backup/src/b.ts").is_file());

    let text = create_formatter(OutputFormat::Text, false, false, false)
        .format_removal(&report)
        .unwrap();
    assert!(text.contains("src/b.ts"));

    // A fresh process sees the backups left by the previous one
    let mut later = Pruner::new(settings_for(root)).unwrap();
    let history = later.removal_history().unwrap();
    assert!(history.removed_files.is_empty());
    assert_eq!(history.backed_up_files, vec![PathBuf::from("src/b.ts")]);

    let rollback = later.rollback_removal();
    assert!(rollback.success);
    assert_eq!(rollback.restored, vec![PathBuf::from("src/b.ts")]);
    assert_eq!(
        fs::read_to_string(root.join("src/b.ts")).unwrap(),
        "console.log('b');\n"
    );
    assert!(later.removal_history().unwrap().backed_up_files.is_empty());
}

#[test]
fn test_cleanup_backups_makes_rollback_a_no_op() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    create_project(root);

    let mut pruner = Pruner::new(settings_for(root)).unwrap();
    let report = pruner
        .remove_unused_files(&RemoveOptions {
            auto_confirm: true,
            ..RemoveOptions::default()
        })
        .unwrap();
    assert!(report.success);

    pruner.cleanup_backups().unwrap();
    assert!(!root.join(".cleanup-backup").exists());

    let rollback = pruner.rollback_removal();
    assert!(rollback.success);
    assert!(rollback.restored.is_empty());
    assert!(!root.join("src/b.ts").exists());
}
