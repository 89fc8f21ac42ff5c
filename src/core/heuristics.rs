//! Text heuristics layered on top of the import graph
//!
//! Assets and package dependencies are not resolved through imports. Both are
//! decided by searching the raw text of code files, so comments and string
//! literals count as references.

use crate::error::Result;
use crate::utils::to_slash;
use regex::RegexSet;
use std::path::{Path, PathBuf};

/// Raw text of one code file
#[derive(Debug, Clone)]
pub struct CodeText {
    pub path: PathBuf,
    pub text: String,
}

/// Finds code files that mention an asset by file name or relative path
pub struct AssetReferenceScanner;

impl AssetReferenceScanner {
    /// Code files whose text contains the asset's file name or its
    /// `/`-separated relative path, in the order given
    pub fn referencing_files(asset: &Path, code: &[CodeText]) -> Vec<PathBuf> {
        let Some(name) = asset.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let slashed = to_slash(asset);

        code.iter()
            .filter(|c| c.path != asset)
            .filter(|c| c.text.contains(name) || c.text.contains(slashed.as_str()))
            .map(|c| c.path.clone())
            .collect()
    }
}

/// Matches import, re-export and `require()` references to one package
pub struct DependencyUsageMatcher {
    name: String,
    patterns: RegexSet,
}

impl DependencyUsageMatcher {
    pub fn new(name: &str) -> Result<Self> {
        let escaped = regex::escape(name);
        let patterns = RegexSet::new([
            format!(r#"from\s+['"]{}['"]"#, escaped),
            format!(r#"import\s+['"]{}['"]"#, escaped),
            format!(r#"require\s*\(\s*['"]{}['"]\s*\)"#, escaped),
            format!(r#"from\s+['"]{}/"#, escaped),
            format!(r#"import\s+['"]{}/"#, escaped),
            format!(r#"require\s*\(\s*['"]{}/"#, escaped),
        ])?;

        Ok(Self {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, text: &str) -> bool {
        self.patterns.is_match(text)
    }

    /// Code files that reference the package, in the order given
    pub fn usage_locations(&self, code: &[CodeText]) -> Vec<PathBuf> {
        code.iter()
            .filter(|c| self.matches(&c.text))
            .map(|c| c.path.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(path: &str, text: &str) -> CodeText {
        CodeText {
            path: PathBuf::from(path),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_dependency_patterns() {
        let matcher = DependencyUsageMatcher::new("foo-lib").unwrap();

        assert!(matcher.matches("import x from 'foo-lib';"));
        assert!(matcher.matches("import { y } from \"foo-lib/sub\";"));
        assert!(matcher.matches("import 'foo-lib';"));
        assert!(matcher.matches("import 'foo-lib/styles.css';"));
        assert!(matcher.matches("const f = require( 'foo-lib' );"));
        assert!(matcher.matches("const f = require('foo-lib/deep/path');"));
        assert!(matcher.matches("export { a } from 'foo-lib';"));

        assert!(!matcher.matches("import x from 'foo-library';"));
        assert!(!matcher.matches("import x from 'my-foo-lib';"));
        assert!(!matcher.matches("const s = 'foo-lib';"));
    }

    #[test]
    fn test_scoped_and_special_names_are_escaped() {
        let matcher = DependencyUsageMatcher::new("@scope/pkg.js").unwrap();
        assert!(matcher.matches("import a from '@scope/pkg.js';"));
        assert!(!matcher.matches("import a from '@scope/pkgXjs';"));
    }

    #[test]
    fn test_usage_locations() {
        let matcher = DependencyUsageMatcher::new("react").unwrap();
        let files = vec![
            code("src/a.tsx", "import React from 'react';"),
            code("src/b.ts", "export const b = 1;"),
            code("src/c.tsx", "import { createRoot } from 'react-dom/client';\nimport 'react/jsx-runtime';"),
        ];

        assert_eq!(
            matcher.usage_locations(&files),
            vec![PathBuf::from("src/a.tsx"), PathBuf::from("src/c.tsx")]
        );
    }

    #[test]
    fn test_asset_references() {
        let files = vec![
            code("src/main.ts", "import './style.css';"),
            code("src/other.ts", "const logo = '/src/assets/logo.svg';"),
            code("src/none.ts", "export {}"),
        ];

        assert_eq!(
            AssetReferenceScanner::referencing_files(Path::new("src/style.css"), &files),
            vec![PathBuf::from("src/main.ts")]
        );
        assert_eq!(
            AssetReferenceScanner::referencing_files(Path::new("src/assets/logo.svg"), &files),
            vec![PathBuf::from("src/other.ts")]
        );
    }
}
