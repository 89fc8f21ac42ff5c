//! Parsing functionality
//!
//! Source extraction over the OXC AST and package manifest reading.

pub mod ast_parser;
pub mod module_visitor;
pub mod package_json;

pub use ast_parser::{
    AllocatorPool, Extraction, ExtractionContext, FileExtraction, OxcExtractor, SourceExtractor,
};
pub use module_visitor::ModuleVisitor;
pub use package_json::{Manifest, ManifestReader};
