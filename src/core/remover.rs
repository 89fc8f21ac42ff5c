//! Backup-then-delete file removal with rollback
//!
//! Every removed file is first copied to a mirror of its relative path under
//! the backup directory, then deleted. The in-memory ledger tracks what this
//! process removed; the backup directory itself is the durable record, so
//! rollback also picks up files removed by earlier runs.

use crate::error::{PrunerError, Result};
use crate::models::config::{default_entry_points, DEFAULT_BACKUP_DIR};
use crate::models::file_record::FileRecord;
use crate::models::removal::{
    FailedItem, FileOutcome, RemovalBatch, RemovalRequest, RestoreBatch, UnusedRemoval,
};
use crate::utils::{normalize_relative, to_slash, ProtectionPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct SafetyRemover {
    project_root: PathBuf,
    backup_dir: PathBuf,
    protection: ProtectionPolicy,
    removed: Vec<PathBuf>,
}

impl SafetyRemover {
    /// Remover for `project_root`; `backup_dir` is relative to the root
    pub fn new(project_root: &Path, backup_dir: &Path) -> Result<Self> {
        let normalized = normalize_relative(backup_dir)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                PrunerError::config_error(format!(
                    "backup_dir must be a directory inside the project, got '{}'",
                    backup_dir.display()
                ))
            })?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            protection: ProtectionPolicy::new(&default_entry_points(), &[])?
                .with_backup_dir(&normalized),
            backup_dir: normalized,
            removed: Vec::new(),
        })
    }

    /// Remover with the default `.cleanup-backup` directory
    pub fn with_default_backup(project_root: &Path) -> Result<Self> {
        Self::new(project_root, Path::new(DEFAULT_BACKUP_DIR))
    }

    pub fn with_protection(mut self, protection: ProtectionPolicy) -> Self {
        self.protection = protection.with_backup_dir(&self.backup_dir);
        self
    }

    /// Backup directory relative to the project root
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn backup_root(&self) -> PathBuf {
        self.project_root.join(&self.backup_dir)
    }

    /// Files removed by this remover that have not been restored
    pub fn removed_files(&self) -> Vec<PathBuf> {
        self.removed.clone()
    }

    /// Normalized project-relative form of `path`, or `None` for absolute
    /// paths, paths escaping the root, and paths inside the backup directory
    fn project_relative(&self, path: &Path) -> Option<PathBuf> {
        normalize_relative(path)
            .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(&self.backup_dir))
    }

    fn ensure_backup_root(&self) -> Result<()> {
        let root = self.backup_root();
        fs::create_dir_all(&root).map_err(|source| PrunerError::BackupDirectory { path: root, source })
    }

    /// Back up and delete one project-relative file
    pub fn remove_file(&mut self, path: &Path) -> FileOutcome {
        let Some(relative) = self.project_relative(path) else {
            return FileOutcome::Failed(invalid_path(path));
        };
        let path = relative.as_path();
        let original = self.project_root.join(path);
        if !original.is_file() {
            return FileOutcome::Failed(format!("File does not exist: {}", path.display()));
        }

        let backup = self.backup_root().join(path);
        if let Some(parent) = backup.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return FileOutcome::Failed(format!(
                    "Failed to remove {}: cannot create backup directory: {}",
                    path.display(),
                    err
                ));
            }
        }

        if let Err(err) = fs::copy(&original, &backup) {
            return FileOutcome::Failed(format!(
                "Failed to remove {}: backup failed: {}",
                path.display(),
                err
            ));
        }

        if let Err(err) = fs::remove_file(&original) {
            // Leave no backup behind for a file that is still in place.
            let _ = fs::remove_file(&backup);
            return FileOutcome::Failed(format!("Failed to remove {}: {}", path.display(), err));
        }

        if !self.removed.iter().any(|p| p == path) {
            self.removed.push(path.to_path_buf());
        }
        tracing::info!(
            file = %path.display(),
            backup = %backup.display(),
            "removed"
        );
        FileOutcome::Done
    }

    /// Remove each file independently; only a missing backup root aborts
    pub fn remove_files(&mut self, paths: &[PathBuf]) -> Result<RemovalBatch> {
        let mut batch = RemovalBatch::default();
        if paths.is_empty() {
            return Ok(batch);
        }

        self.ensure_backup_root()?;

        for path in paths {
            match self.remove_file(path) {
                FileOutcome::Done => batch.successful.push(path.clone()),
                FileOutcome::Failed(error) => {
                    tracing::error!(file = %path.display(), "{}", error);
                    batch.failed.push(FailedItem::new(path.clone(), error));
                }
            }
        }

        tracing::info!(
            removed = batch.successful.len(),
            failed = batch.failed.len(),
            "removal batch finished"
        );
        Ok(batch)
    }

    /// Remove the unused, unprotected files of an analysis
    ///
    /// Files matching an exclude glob are reported as skipped. A dry run only
    /// reports `would_remove`.
    pub fn remove_unused_files(
        &mut self,
        records: &[FileRecord],
        request: &RemovalRequest,
    ) -> Result<UnusedRemoval> {
        let excludes = request
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut outcome = UnusedRemoval::default();
        for record in records {
            if record.is_used || self.protection.is_protected(&record.path) {
                continue;
            }
            let slashed = to_slash(&record.path);
            if excludes.iter().any(|p| p.matches(&slashed)) {
                outcome.skipped.push(record.path.clone());
            } else {
                outcome.would_remove.push(record.path.clone());
            }
        }

        if request.dry_run {
            return Ok(outcome);
        }

        let batch = self.remove_files(&outcome.would_remove)?;
        outcome.actually_removed = batch.successful;
        outcome.failed = batch.failed;
        Ok(outcome)
    }

    /// Restore one file from its backup and drop the backup copy
    pub fn restore_file(&mut self, path: &Path) -> FileOutcome {
        let Some(relative) = self.project_relative(path) else {
            return FileOutcome::Failed(invalid_path(path));
        };
        let path = relative.as_path();
        let backup = self.backup_root().join(path);
        if !backup.is_file() {
            return FileOutcome::Failed(format!("Backup not found: {}", backup.display()));
        }

        let target = self.project_root.join(path);
        if let Some(parent) = target.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return FileOutcome::Failed(format!("Failed to restore {}: {}", path.display(), err));
            }
        }
        if target.exists() {
            tracing::warn!(file = %path.display(), "overwriting existing file with backup");
        }

        if let Err(err) = fs::copy(&backup, &target) {
            return FileOutcome::Failed(format!("Failed to restore {}: {}", path.display(), err));
        }
        if let Err(err) = fs::remove_file(&backup) {
            tracing::warn!(file = %backup.display(), "restored but could not delete backup: {}", err);
        }

        self.removed.retain(|p| p != path);
        tracing::info!(file = %path.display(), "restored");
        FileOutcome::Done
    }

    /// Restore every tracked file and every file found in the backup directory
    pub fn restore_all(&mut self) -> RestoreBatch {
        let mut targets = self.removed.clone();
        match self.backed_up_files() {
            Ok(found) => targets.extend(found),
            Err(err) => tracing::warn!("could not list backups: {}", err),
        }
        targets.sort();
        targets.dedup();

        let mut batch = RestoreBatch::default();
        for path in targets {
            match self.restore_file(&path) {
                FileOutcome::Done => batch.successful.push(path),
                FileOutcome::Failed(error) => batch.failed.push(FailedItem::new(path, error)),
            }
        }

        self.prune_empty_backup_dirs();
        batch
    }

    /// Files currently held in the backup directory, relative to it
    pub fn backed_up_files(&self) -> Result<Vec<PathBuf>> {
        let root = self.backup_root();
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(|err| {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("backup walk failed"));
                PrunerError::BackupDirectory {
                    path: root.clone(),
                    source,
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&root) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Delete the backup directory and forget the ledger
    pub fn cleanup_backups(&mut self) -> Result<()> {
        let root = self.backup_root();
        if root.exists() {
            fs::remove_dir_all(&root)
                .map_err(|source| PrunerError::BackupDirectory { path: root.clone(), source })?;
            tracing::info!(dir = %root.display(), "backup directory removed");
        }
        self.removed.clear();
        Ok(())
    }

    fn prune_empty_backup_dirs(&self) {
        let root = self.backup_root();
        if !root.exists() {
            return;
        }
        let dirs: Vec<PathBuf> = WalkDir::new(&root)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect();
        // remove_dir only succeeds on empty directories
        for dir in dirs {
            let _ = fs::remove_dir(&dir);
        }
    }
}

fn invalid_path(path: &Path) -> String {
    format!(
        "Invalid path {}: must be relative to the project root and outside the backup directory",
        path.display()
    )
}
