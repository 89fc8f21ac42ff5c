//! Data models and structures for pruner

pub mod analysis;
pub mod config;
pub mod dependency;
pub mod file_record;
pub mod removal;
pub mod usage_graph;
pub mod validation;

pub use analysis::{
    AnalysisResult, AnalysisWarning, DetectionResult, ImportEdge, ReviewItem, ReviewReason,
};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency::DependencyRecord;
pub use file_record::{
    ExportedSymbol, FileInfo, FileRecord, ImportedModule, ModuleSyntax, SymbolKind,
};
pub use removal::{
    FailedItem, FileOutcome, RemovalBatch, RemovalDetails, RemovalHistory, RemovalReport,
    RemovalRequest, RemovalSummary, RemoveOptions, RestoreBatch, RollbackResult, UnusedRemoval,
};
pub use usage_graph::UsageGraph;
pub use validation::{
    BrokenReference, BuildValidation, PostRemovalValidation, PreRemovalValidation,
    ReferenceValidation,
};
