//! Core functionality: scanning, analysis, validation and removal

pub mod analyzer;
pub mod build;
pub mod heuristics;
pub mod pruner;
pub mod remover;
pub mod scanner;
pub mod validator;

pub use analyzer::{analyze_project, ProjectAnalyzer};
pub use build::BuildCommand;
pub use pruner::{ConfirmFn, Pruner};
pub use remover::SafetyRemover;
pub use scanner::TreeScanner;
pub use validator::Validator;
