//! Analysis and detection results

use crate::models::dependency::DependencyRecord;
use crate::models::file_record::FileRecord;
use crate::models::usage_graph::UsageGraph;
use crate::utils::format_bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-fatal problem met while analyzing a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub path: Option<PathBuf>,
    pub message: String,
}

impl AnalysisWarning {
    pub fn for_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A resolved import from one project file to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    pub specifier: String,
}

/// Immutable snapshot produced by one analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub files: Vec<FileRecord>,
    pub dependencies: Vec<DependencyRecord>,
    pub total_files: usize,
    pub total_size: u64,
    pub unused_files: Vec<PathBuf>,
    pub unused_dependencies: Vec<String>,
    /// Configured entry points that exist in the tree
    pub entry_points: Vec<PathBuf>,
    pub import_edges: Vec<ImportEdge>,
    pub warnings: Vec<AnalysisWarning>,
    pub analyzed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl AnalysisResult {
    /// Look up the record for a relative path
    pub fn file(&self, path: &Path) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Records keyed by path, for repeated lookups
    pub fn file_index(&self) -> HashMap<&Path, &FileRecord> {
        self.files.iter().map(|f| (f.path.as_path(), f)).collect()
    }

    /// Total size of the given files; unknown paths count as zero
    pub fn size_of(&self, paths: &[PathBuf]) -> u64 {
        let index = self.file_index();
        paths
            .iter()
            .filter_map(|p| index.get(p.as_path()))
            .map(|f| f.size)
            .sum()
    }

    pub fn is_unused(&self, path: &Path) -> bool {
        self.unused_files.iter().any(|p| p == path)
    }

    /// Bytes held by the unused files
    pub fn unused_size(&self) -> u64 {
        self.size_of(&self.unused_files)
    }

    /// Rebuild the usage graph from the recorded files and import edges
    pub fn usage_graph(&self) -> UsageGraph {
        let mut graph = UsageGraph::new();
        for file in &self.files {
            graph.add_file(&file.path);
        }
        for edge in &self.import_edges {
            graph.add_import(&edge.from, &edge.to);
        }
        graph
    }
}

/// Why an unused file needs a human look before removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewReason {
    LargeFile { size: u64 },
    Configuration,
    TypeDefinition,
    Documentation,
    Test,
    HasExports { names: Vec<String> },
}

impl ReviewReason {
    /// Classify an unused file; `None` means it is safe to remove
    pub fn classify(record: &FileRecord, size_threshold: u64) -> Option<ReviewReason> {
        let path = record.path.to_string_lossy().replace('\\', "/");
        let lower = path.to_lowercase();

        if record.size > size_threshold {
            Some(ReviewReason::LargeFile { size: record.size })
        } else if path.contains("config") {
            Some(ReviewReason::Configuration)
        } else if path.ends_with(".d.ts") {
            Some(ReviewReason::TypeDefinition)
        } else if lower.contains("readme") || lower.contains("doc") {
            Some(ReviewReason::Documentation)
        } else if path.contains("test") || path.contains("spec") {
            Some(ReviewReason::Test)
        } else if !record.exports.is_empty() {
            Some(ReviewReason::HasExports {
                names: record.exports.clone(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewReason::LargeFile { size } => {
                write!(f, "Large file ({}) - review before removal", format_bytes(*size))
            }
            ReviewReason::Configuration => write!(f, "Configuration file - verify not needed"),
            ReviewReason::TypeDefinition => write!(f, "Type definition file - verify not needed"),
            ReviewReason::Documentation => write!(f, "Documentation file - review content"),
            ReviewReason::Test => write!(f, "Test file - verify not needed"),
            ReviewReason::HasExports { names } => write!(
                f,
                "Has exports ({}) - verify not used dynamically",
                names.join(", ")
            ),
        }
    }
}

/// An unused file held back for manual review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub file: PathBuf,
    pub reason: ReviewReason,
    pub size: u64,
}

/// Unused files split into safe and needs-review buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub analysis: AnalysisResult,
    pub unused_files: Vec<PathBuf>,
    pub safe_to_remove: Vec<PathBuf>,
    pub requires_review: Vec<ReviewItem>,
}
