//! Pruner - unused-file and dependency analysis for JavaScript/TypeScript projects
//!
//! This library scans a project tree, extracts import references from source
//! files, builds a usage graph from the entry points and removes unused files
//! behind a validation gate with backups that can be rolled back.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{analyze_project, ProjectAnalyzer, Pruner, SafetyRemover, Validator};
pub use error::{ErrorSeverity, PrunerError, Result, ResultExt};
pub use models::{
    analysis::{AnalysisResult, DetectionResult},
    config::Settings,
    removal::{RemovalReport, RemoveOptions, RollbackResult},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
