//! Project tree scanning
//!
//! Walks the project root with a built-in denylist, user exclude globs and an
//! extension allow-list. An unreadable directory aborts the scan; partial file
//! lists are never returned.

use crate::error::{PrunerError, Result};
use crate::models::config::{default_include_extensions, Settings, DEFAULT_BACKUP_DIR};
use crate::models::file_record::FileInfo;
use crate::utils::to_slash;
use chrono::{DateTime, Utc};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    ".next",
    ".vercel",
    ".kiro",
    ".qodo",
    ".vscode",
];

/// File-name patterns that are never scanned
const EXCLUDED_FILES: &[&str] = &[".DS_Store", ".env*", "*.log", "*.lock", "*.lockb"];

const CODE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

const ASSET_EXTENSIONS: &[&str] = &["css", "scss", "png", "jpg", "jpeg", "gif", "svg", "ico"];

/// Recursive, deterministic scanner for one project root
#[derive(Debug, Clone)]
pub struct TreeScanner {
    root: PathBuf,
    backup_dir: PathBuf,
    report_file: Option<PathBuf>,
    include_extensions: Vec<String>,
    excluded_files: Vec<Pattern>,
    exclude_patterns: Vec<Pattern>,
}

impl TreeScanner {
    /// Scanner with the default extension list and no user excludes
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            report_file: None,
            include_extensions: default_include_extensions(),
            excluded_files: EXCLUDED_FILES
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
            exclude_patterns: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(&settings.project_root)
            .with_backup_dir(&settings.backup_dir)
            .with_report_file(settings.report_file.as_deref())
            .with_extensions(&settings.include_extensions)
            .with_exclude_patterns(&settings.exclude_patterns)?)
    }

    /// Backup directory (relative to the root), always excluded
    pub fn with_backup_dir(mut self, backup_dir: &Path) -> Self {
        self.backup_dir =
            crate::utils::normalize_relative(backup_dir).unwrap_or_else(|| backup_dir.to_path_buf());
        self
    }

    /// Skip the persisted analysis report when it lies inside the root
    pub fn with_report_file(mut self, report_file: Option<&Path>) -> Self {
        self.report_file = report_file.and_then(|p| {
            if p.is_absolute() {
                p.strip_prefix(&self.root).ok().map(Path::to_path_buf)
            } else {
                crate::utils::normalize_relative(p)
            }
        });
        self
    }

    /// Replace the extension allow-list; leading dots are ignored
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.include_extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Add user glob patterns, matched against `/`-separated relative paths
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self> {
        for pattern in patterns {
            self.exclude_patterns.push(Pattern::new(pattern)?);
        }
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the tree, returning sorted project-relative file paths
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PrunerError::InvalidPath {
                path: self.root.clone(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|err| walk_error(&self.root, err))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if self.is_included_file(relative) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        tracing::debug!(root = %self.root.display(), count = files.len(), "scan complete");
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        if let Some(name) = entry.file_name().to_str() {
            if EXCLUDED_DIRS.contains(&name) {
                return true;
            }
        }

        let Ok(relative) = entry.path().strip_prefix(&self.root) else {
            return false;
        };
        if relative == self.backup_dir {
            return true;
        }

        let slashed = to_slash(relative);
        self.exclude_patterns.iter().any(|p| p.matches(&slashed))
    }

    fn is_included_file(&self, relative: &Path) -> bool {
        let Some(name) = relative.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.excluded_files.iter().any(|p| p.matches(name)) {
            return false;
        }
        if self.report_file.as_deref() == Some(relative) {
            return false;
        }

        let slashed = to_slash(relative);
        if self.exclude_patterns.iter().any(|p| p.matches(&slashed)) {
            return false;
        }

        match extension_of(relative) {
            Some(ext) => self.include_extensions.iter().any(|e| *e == ext),
            None => false,
        }
    }

    /// Metadata for a project-relative file, zeroed if unreadable
    pub fn file_info(&self, relative: &Path) -> FileInfo {
        file_info(&self.root.join(relative))
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> PrunerError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.io_error().map(|e| e.kind()) {
        Some(std::io::ErrorKind::PermissionDenied) => PrunerError::permission_denied(path),
        _ => PrunerError::directory_traversal_error(path, err.to_string()),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// `.ts`, `.tsx`, `.js` or `.jsx`
pub fn is_code_file(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.as_str()))
}

/// Stylesheets and images
pub fn is_asset_file(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.as_str()))
}

/// Size and modification time; the zeroed default when metadata is unavailable
pub fn file_info(path: &Path) -> FileInfo {
    match fs::metadata(path) {
        Ok(meta) => FileInfo {
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        },
        Err(err) => {
            tracing::debug!(file = %path.display(), "metadata unavailable: {}", err);
            FileInfo::default()
        }
    }
}

/// Read a project-relative file as UTF-8 text
pub fn read_source(root: &Path, relative: &Path) -> Option<String> {
    match fs::read_to_string(root.join(relative)) {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(file = %relative.display(), "could not read file: {}", err);
            None
        }
    }
}
