//! Reference extraction using OXC
//!
//! [`SourceExtractor`] is the seam between the analyzer and the syntax layer.
//! [`OxcExtractor`] is the production implementation; [`ExtractionContext`]
//! bundles an extractor with a path resolver for one project and is owned by
//! whoever runs the analysis.

use crate::core::scanner::read_source;
use crate::error::{PrunerError, Result};
use crate::models::analysis::AnalysisWarning;
use crate::models::file_record::ModuleSyntax;
use crate::parsers::module_visitor::ModuleVisitor;
use crate::utils::PathResolver;
use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Syntax of one file plus any recoverable parser diagnostics
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub syntax: ModuleSyntax,
    pub diagnostics: Vec<String>,
}

/// Given a file path and its text, return its imports and exports
pub trait SourceExtractor: Send + Sync {
    fn extract(&self, path: &Path, source_text: &str) -> Result<Extraction>;
}

/// Thread-safe allocator pool for reuse across parses
pub struct AllocatorPool {
    allocators: Mutex<Vec<Allocator>>,
}

impl AllocatorPool {
    pub fn new(size: usize) -> Self {
        let allocators = (0..size).map(|_| Allocator::default()).collect();
        Self {
            allocators: Mutex::new(allocators),
        }
    }

    /// Take an allocator from the pool, or a fresh one if the pool is empty
    pub fn take(&self) -> Allocator {
        self.allocators.lock().pop().unwrap_or_default()
    }

    /// Reset an allocator and return it to the pool
    pub fn give_back(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }

    pub fn available(&self) -> usize {
        self.allocators.lock().len()
    }
}

/// OXC-backed extractor for `.ts`, `.tsx`, `.js` and `.jsx` files
pub struct OxcExtractor {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl OxcExtractor {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions {
                parse_regular_expression: true,
                ..ParseOptions::default()
            },
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }
}

impl Default for OxcExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for OxcExtractor {
    fn extract(&self, path: &Path, source_text: &str) -> Result<Extraction> {
        let source_type = SourceType::from_path(path)
            .map_err(|_| PrunerError::parse_error(path, "unsupported file extension"))?;

        let allocator = self.allocator_pool.take();

        // The AST borrows the allocator; everything kept is owned before it goes back.
        let outcome = {
            let ret = Parser::new(&allocator, source_text, source_type)
                .with_options(self.parse_options.clone())
                .parse();

            if ret.panicked {
                Err(first_diagnostic(&ret.errors))
            } else {
                Ok(Extraction {
                    syntax: ModuleVisitor::collect(&ret.program, source_text),
                    diagnostics: ret.errors.iter().map(|e| format!("{}", e)).collect(),
                })
            }
        };

        self.allocator_pool.give_back(allocator);

        outcome.map_err(|message| PrunerError::parse_error(path, message))
    }
}

fn first_diagnostic(errors: &[OxcDiagnostic]) -> String {
    errors
        .first()
        .map(|e| format!("{}", e))
        .unwrap_or_else(|| "parser gave up".to_string())
}

/// Extraction result for one file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Raw text, `None` if the file could not be read
    pub source: Option<String>,
    pub syntax: ModuleSyntax,
    pub warnings: Vec<AnalysisWarning>,
}

/// Caller-owned extraction state for one project
pub struct ExtractionContext {
    project_root: PathBuf,
    resolver: PathResolver,
    extractor: Arc<dyn SourceExtractor>,
    parallel: bool,
}

impl ExtractionContext {
    /// Context using the OXC extractor
    pub fn new(project_root: &Path) -> Self {
        Self::with_extractor(project_root, Arc::new(OxcExtractor::new()))
    }

    pub fn with_extractor(project_root: &Path, extractor: Arc<dyn SourceExtractor>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            resolver: PathResolver::new(project_root),
            extractor,
            parallel: true,
        }
    }

    /// Toggle parallel reads and parses
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Resolve an import specifier written in `from_file`
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        self.resolver.resolve(specifier, from_file)
    }

    /// Read and extract one project-relative file
    ///
    /// Read and parse failures produce empty syntax and a warning.
    pub fn extract_file(&self, relative: &Path) -> FileExtraction {
        let Some(source) = read_source(&self.project_root, relative) else {
            return FileExtraction {
                path: relative.to_path_buf(),
                source: None,
                syntax: ModuleSyntax::default(),
                warnings: vec![AnalysisWarning::for_file(relative, "could not read file")],
            };
        };

        let (syntax, warnings) = match self.extractor.extract(relative, &source) {
            Ok(extraction) => {
                let warnings = extraction
                    .diagnostics
                    .into_iter()
                    .map(|d| AnalysisWarning::for_file(relative, format!("syntax error: {}", d)))
                    .collect();
                (extraction.syntax, warnings)
            }
            Err(err) => {
                tracing::warn!(file = %relative.display(), "extraction failed: {}", err);
                (
                    ModuleSyntax::default(),
                    vec![AnalysisWarning::for_file(relative, err.to_string())],
                )
            }
        };

        FileExtraction {
            path: relative.to_path_buf(),
            source: Some(source),
            syntax,
            warnings,
        }
    }

    /// Extract every file, preserving input order
    pub fn extract_references(&self, files: &[PathBuf]) -> Vec<FileExtraction> {
        if self.parallel {
            files.par_iter().map(|f| self.extract_file(f)).collect()
        } else {
            files.iter().map(|f| self.extract_file(f)).collect()
        }
    }

    /// Drop resolver caches after the tree changed
    pub fn invalidate(&self) {
        self.resolver.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_record::SymbolKind;
    use std::fs;
    use tempfile::TempDir;

    fn extract(name: &str, source: &str) -> Extraction {
        OxcExtractor::new().extract(Path::new(name), source).unwrap()
    }

    #[test]
    fn test_static_imports() {
        let result = extract(
            "src/main.tsx",
            r#"import React from 'react';
import { a as alpha, b } from './a';
import * as utils from '../utils';
import './style.css';
import type { Props } from './types';
"#,
        );
        let imports = &result.syntax.imports;

        assert_eq!(imports.len(), 5);
        assert_eq!(imports[0].specifier, "react");
        assert!(imports[0].is_default_binding);
        assert_eq!(imports[0].bound_names, vec!["React"]);

        assert_eq!(imports[1].bound_names, vec!["alpha", "b"]);
        assert_eq!(imports[1].line, 2);

        assert!(imports[2].is_namespace_binding);
        assert_eq!(imports[2].bound_names, vec!["utils"]);

        assert_eq!(imports[3].specifier, "./style.css");
        assert!(imports[3].bound_names.is_empty());

        assert!(imports[4].is_type_only);
    }

    #[test]
    fn test_require_and_dynamic_import() {
        let result = extract(
            "src/loader.js",
            r#"const fs = require('fs');
async function load() {
  const mod = await import('./lazy');
  return mod;
}
export const later = () => import('./later').then((m) => m.default);
"#,
        );
        let specs: Vec<&str> = result.syntax.imports.iter().map(|i| i.specifier.as_str()).collect();

        assert_eq!(specs, vec!["fs", "./lazy", "./later"]);
        assert!(!result.syntax.imports[0].is_dynamic);
        assert!(result.syntax.imports[1].is_dynamic);
        assert_eq!(result.syntax.imports[1].line, 3);
    }

    #[test]
    fn test_exports() {
        let result = extract(
            "src/lib.ts",
            r#"export const x = 1, y = 2;
export function helper() {}
export class Widget {}
export interface Shape { w: number }
export type Id = string;
export enum Color { Red }
const z = 3;
export { z as zed };
export default helper;
"#,
        );
        let exports = &result.syntax.exports;
        let names: Vec<&str> = exports.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["x", "y", "helper", "Widget", "Shape", "Id", "Color", "zed", "default"]
        );
        assert_eq!(exports[2].kind, SymbolKind::Function);
        assert_eq!(exports[3].kind, SymbolKind::Class);
        assert_eq!(exports[4].kind, SymbolKind::Interface);
        assert_eq!(exports[5].kind, SymbolKind::Type);
        assert_eq!(exports[6].kind, SymbolKind::Enum);
        assert!(exports[8].is_default);
        assert_eq!(exports[8].line, 9);
    }

    #[test]
    fn test_reexports_are_imports() {
        let result = extract(
            "src/index.ts",
            r#"export * from './a';
export { b } from './b';
export * as ns from './c';
"#,
        );
        let specs: Vec<&str> = result.syntax.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specs, vec!["./a", "./b", "./c"]);
        assert_eq!(result.syntax.export_names(), vec!["b", "ns"]);
    }

    #[test]
    fn test_unknown_extension_is_error() {
        assert!(OxcExtractor::new()
            .extract(Path::new("styles.css"), "body {}")
            .is_err());
    }

    #[test]
    fn test_allocator_pool_reuse() {
        let pool = AllocatorPool::new(2);
        assert_eq!(pool.available(), 2);
        let a = pool.take();
        let b = pool.take();
        let c = pool.take();
        assert_eq!(pool.available(), 0);
        pool.give_back(a);
        pool.give_back(b);
        pool.give_back(c);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn test_context_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/ok.ts"), "import './missing';").unwrap();

        let ctx = ExtractionContext::new(dir.path()).parallel(false);
        let out = ctx.extract_references(&[PathBuf::from("src/ok.ts"), PathBuf::from("src/gone.ts")]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].syntax.imports.len(), 1);
        assert!(out[0].warnings.is_empty());
        assert!(out[1].source.is_none());
        assert_eq!(out[1].warnings.len(), 1);
    }

    struct FixedExtractor;

    impl SourceExtractor for FixedExtractor {
        fn extract(&self, _path: &Path, _source_text: &str) -> Result<Extraction> {
            Err(PrunerError::parse_error("x", "always fails"))
        }
    }

    #[test]
    fn test_custom_extractor_failure_becomes_warning() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "export const a = 1;").unwrap();

        let ctx = ExtractionContext::with_extractor(dir.path(), Arc::new(FixedExtractor));
        let out = ctx.extract_file(Path::new("a.ts"));

        assert!(out.syntax.imports.is_empty());
        assert!(out.syntax.exports.is_empty());
        assert!(out.source.is_some());
        assert_eq!(out.warnings.len(), 1);
    }
}
