//! Analysis over small on-disk projects

use super::support::{settings_for, write};
use pruner::core::ProjectAnalyzer;
use pruner::models::analysis::AnalysisResult;
use pruner::models::config::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

fn analyze(settings: Settings) -> AnalysisResult {
    ProjectAnalyzer::new(settings).unwrap().analyze().unwrap()
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn test_reachability_follows_import_chain() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "import { a } from './a';\nconsole.log(a);\n");
    write(root, "src/a.ts", "import { b } from './lib/b';\nexport const a = b;\n");
    write(root, "src/lib/b.ts", "const c = require('../c');\nexport const b = c;\n");
    write(root, "src/c.js", "module.exports = 1;\n");
    write(root, "src/d.ts", "console.log('d');\n");

    let settings = Settings {
        reachability_only: true,
        ..settings_for(root)
    };
    let result = analyze(settings);

    assert_eq!(result.entry_points, paths(&["src/main.ts"]));
    assert_eq!(result.unused_files, paths(&["src/d.ts"]));
    for used in ["src/a.ts", "src/lib/b.ts", "src/c.js"] {
        assert!(result.file(&PathBuf::from(used)).unwrap().is_used, "{used}");
    }
    assert_eq!(
        result.file(&PathBuf::from("src/lib/b.ts")).unwrap().referenced_by,
        paths(&["src/a.ts"])
    );
}

#[test]
fn test_direct_import_marks_target_used_without_reachability() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/orphan.ts", "import './helper';\n");
    write(root, "src/helper.ts", "console.log('helper');\n");

    let direct = analyze(settings_for(root));
    assert_eq!(direct.unused_files, paths(&["src/orphan.ts"]));

    let reachable = analyze(Settings {
        reachability_only: true,
        ..settings_for(root)
    });
    assert_eq!(reachable.unused_files, paths(&["src/helper.ts", "src/orphan.ts"]));
}

#[test]
fn test_import_cycles_terminate() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "import './a';\n");
    write(root, "src/a.ts", "import './b';\n");
    write(root, "src/b.ts", "import './a';\nimport './main';\n");
    write(root, "src/p.ts", "import './q';\n");
    write(root, "src/q.ts", "import './p';\n");

    let result = analyze(Settings {
        reachability_only: true,
        ..settings_for(root)
    });

    assert_eq!(result.unused_files, paths(&["src/p.ts", "src/q.ts"]));
    let graph = result.usage_graph();
    assert_eq!(graph.file_count(), 5);
    assert_eq!(graph.import_count(), 6);
}

#[test]
fn test_subpath_import_counts_as_dependency_use() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "package.json",
        r#"{
            "name": "demo",
            "dependencies": { "foo-lib": "^1.0.0", "foo": "^2.0.0" },
            "devDependencies": { "unused-tool": "^3.0.0" }
        }"#,
    );
    write(root, "src/main.ts", "import sub from 'foo-lib/sub';\nconsole.log(sub);\n");

    let result = analyze(settings_for(root));

    let foo_lib = result.dependencies.iter().find(|d| d.name == "foo-lib").unwrap();
    assert!(foo_lib.is_used);
    assert_eq!(foo_lib.usage_locations, paths(&["src/main.ts"]));

    let mut unused = result.unused_dependencies.clone();
    unused.sort();
    assert_eq!(unused, vec!["foo".to_string(), "unused-tool".to_string()]);
}

#[test]
fn test_protected_files_are_never_reported_unused() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{ "name": "demo" }"#);
    write(root, "tsconfig.json", "{}");
    write(root, "vite.config.ts", "export default {};\n");
    write(root, "tailwind.config.js", "module.exports = {};\n");
    write(root, "public/robots.txt.js", "// served as-is\n");
    write(root, "src/main.ts", "console.log('main');\n");
    write(root, "src/keep/legacy.ts", "console.log('legacy');\n");
    write(root, "src/stale.ts", "console.log('stale');\n");

    let settings = Settings {
        protected_patterns: vec!["src/keep/**".to_string()],
        ..settings_for(root)
    };
    let result = analyze(settings);

    assert_eq!(result.unused_files, paths(&["src/stale.ts"]));
}

#[test]
fn test_broken_manifest_is_a_warning() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{ not json");
    write(root, "src/main.ts", "console.log('main');\n");

    let result = analyze(settings_for(root));

    assert!(result.dependencies.is_empty());
    assert!(!result.warnings.is_empty());
}
