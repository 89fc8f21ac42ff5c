//! Shared fixtures for the integration tests

use pruner::models::config::Settings;
use std::fs;
use std::path::Path;

/// Write `content` to `relative` under `root`, creating parent directories
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Settings for a temporary project with build validation disabled
pub fn settings_for(root: &Path) -> Settings {
    Settings {
        build_command: None,
        ..Settings::for_project(root)
    }
}
