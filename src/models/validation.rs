//! Reference and build validation results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An import in a surviving file that resolves into the removal set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenReference {
    /// File scheduled for removal
    pub file: PathBuf,
    /// Specifier that points at it
    pub missing_import: String,
    /// Surviving file that contains the import
    pub imported_from: PathBuf,
}

/// Whether removing a candidate set would break surviving imports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValidation {
    pub is_valid: bool,
    pub broken_references: Vec<BrokenReference>,
    pub warnings: Vec<String>,
}

/// Outcome of running the project build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildValidation {
    pub can_build: bool,
    /// Captured stdout followed by stderr
    pub output: String,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
    pub timed_out: bool,
}

/// Gate evaluated before anything is deleted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreRemovalValidation {
    pub can_proceed: bool,
    pub reference: ReferenceValidation,
    /// `None` when the build was not run
    pub build: Option<BuildValidation>,
    pub recommendations: Vec<String>,
}

/// Health check after removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRemovalValidation {
    pub is_healthy: bool,
    pub remaining_unused: Vec<PathBuf>,
    pub build: Option<BuildValidation>,
    pub issues: Vec<String>,
}
