//! Per-file records and the syntax summary extracted from source files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One scanned file and what the analysis learned about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Size in bytes, 0 when metadata could not be read
    pub size: u64,
    /// Whether anything reaches or references this file
    pub is_used: bool,
    /// Files that import or textually reference this one, in discovery order
    pub referenced_by: Vec<PathBuf>,
    /// Exported symbol names, `default` for default exports
    pub exports: Vec<String>,
    /// Raw import specifiers as written in the source
    pub imports: Vec<String>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            is_used: false,
            referenced_by: Vec::new(),
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Record `referrer` as referencing this file. Returns false if it was
    /// already recorded.
    pub fn add_referrer(&mut self, referrer: &Path) -> bool {
        if self.referenced_by.iter().any(|p| p == referrer) {
            return false;
        }
        self.referenced_by.push(referrer.to_path_buf());
        true
    }
}

/// Filesystem metadata for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Kind of symbol behind an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Variable,
    Class,
    Interface,
    Type,
    Enum,
    Unknown,
}

/// A symbol exported from a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub is_default: bool,
    /// 1-based line of the export statement
    pub line: usize,
}

/// A module referenced by an import, re-export, `require()` or `import()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedModule {
    /// Specifier exactly as written
    pub specifier: String,
    /// Local names bound by the import; empty for side-effect imports
    pub bound_names: Vec<String>,
    pub is_default_binding: bool,
    pub is_namespace_binding: bool,
    pub is_type_only: bool,
    pub is_dynamic: bool,
    /// 1-based line of the import
    pub line: usize,
}

impl ImportedModule {
    /// A bare module reference with no bindings
    pub fn side_effect(specifier: impl Into<String>, line: usize) -> Self {
        Self {
            specifier: specifier.into(),
            bound_names: Vec::new(),
            is_default_binding: false,
            is_namespace_binding: false,
            is_type_only: false,
            is_dynamic: false,
            line,
        }
    }

    /// Whether the specifier is relative to the importing file
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.')
    }
}

/// Imports and exports of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSyntax {
    pub imports: Vec<ImportedModule>,
    pub exports: Vec<ExportedSymbol>,
}

impl ModuleSyntax {
    /// Exported names in declaration order without duplicates
    pub fn export_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.exports.len());
        for export in &self.exports {
            if !names.contains(&export.name) {
                names.push(export.name.clone());
            }
        }
        names
    }

    /// Import specifiers in source order
    pub fn import_specifiers(&self) -> Vec<String> {
        self.imports.iter().map(|i| i.specifier.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_referrer_dedupes() {
        let mut record = FileRecord::new("src/a.ts", 10);
        assert!(record.add_referrer(Path::new("src/main.ts")));
        assert!(!record.add_referrer(Path::new("src/main.ts")));
        assert!(record.add_referrer(Path::new("src/b.ts")));
        assert_eq!(
            record.referenced_by,
            vec![PathBuf::from("src/main.ts"), PathBuf::from("src/b.ts")]
        );
    }

    #[test]
    fn test_export_names_are_unique() {
        let export = |name: &str| ExportedSymbol {
            name: name.to_string(),
            kind: SymbolKind::Unknown,
            is_default: false,
            line: 1,
        };
        let syntax = ModuleSyntax {
            imports: Vec::new(),
            exports: vec![export("a"), export("b"), export("a")],
        };
        assert_eq!(syntax.export_names(), vec!["a", "b"]);
    }
}
