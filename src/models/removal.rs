//! Removal, restore and rollback results

use crate::models::analysis::ReviewItem;
use crate::models::validation::{PostRemovalValidation, PreRemovalValidation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file that could not be removed or restored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub file: PathBuf,
    pub error: String,
}

impl FailedItem {
    pub fn new(file: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
        }
    }
}

/// Outcome of removing or restoring a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Done,
    Failed(String),
}

impl FileOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, FileOutcome::Done)
    }
}

/// Result of a batch removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalBatch {
    pub successful: Vec<PathBuf>,
    pub failed: Vec<FailedItem>,
}

/// Result of a batch restore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreBatch {
    pub successful: Vec<PathBuf>,
    pub failed: Vec<FailedItem>,
}

/// Filters applied when removing the unused files of an analysis
#[derive(Debug, Clone, Default)]
pub struct RemovalRequest {
    pub dry_run: bool,
    pub exclude_patterns: Vec<String>,
}

/// Result of removing the unused files of an analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedRemoval {
    pub would_remove: Vec<PathBuf>,
    pub actually_removed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedItem>,
}

/// Caller options for the orchestrated removal
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Report the plan without touching the filesystem
    pub dry_run: bool,
    /// Skip pre- and post-removal validation
    pub skip_validation: bool,
    /// Also remove files that were flagged for review
    pub include_review_files: bool,
    /// Glob patterns of files to keep
    pub exclude_patterns: Vec<String>,
    /// The caller already confirmed the removal
    pub auto_confirm: bool,
}

/// Counters for an orchestrated removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalSummary {
    pub total_analyzed: usize,
    pub total_unused: usize,
    pub total_removed: usize,
    pub total_skipped: usize,
    pub total_failed: usize,
    pub space_saved: u64,
}

/// File lists behind a removal summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalDetails {
    pub removed: Vec<PathBuf>,
    pub would_remove: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedItem>,
    pub requires_review: Vec<ReviewItem>,
}

/// Full report of an orchestrated removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalReport {
    pub success: bool,
    pub dry_run: bool,
    pub summary: RemovalSummary,
    pub details: RemovalDetails,
    pub pre_validation: Option<PreRemovalValidation>,
    pub post_validation: Option<PostRemovalValidation>,
}

/// Result of restoring every backed-up file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackResult {
    pub success: bool,
    pub restored: Vec<PathBuf>,
    pub failed: Vec<FailedItem>,
}

/// What the remover currently knows about past removals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalHistory {
    /// Files removed by this process
    pub removed_files: Vec<PathBuf>,
    /// Files present in the backup directory, including earlier runs
    pub backed_up_files: Vec<PathBuf>,
    pub backup_dir: PathBuf,
}
