//! Project analysis
//!
//! One linear pass: scan the tree, extract references from code files, build
//! the usage graph, propagate reachability from the entry points, then apply
//! the asset and dependency heuristics. Reads and parses may run on the rayon
//! pool; every record and graph mutation happens afterwards on this thread.

use crate::core::heuristics::{AssetReferenceScanner, CodeText, DependencyUsageMatcher};
use crate::core::scanner::{is_asset_file, is_code_file, TreeScanner};
use crate::error::Result;
use crate::models::analysis::{AnalysisResult, AnalysisWarning, ImportEdge};
use crate::models::config::Settings;
use crate::models::dependency::DependencyRecord;
use crate::models::file_record::FileRecord;
use crate::models::usage_graph::UsageGraph;
use crate::parsers::ast_parser::{ExtractionContext, SourceExtractor};
use crate::parsers::package_json::ManifestReader;
use crate::utils::ProtectionPolicy;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Analyzer for one project root
pub struct ProjectAnalyzer {
    settings: Settings,
    scanner: TreeScanner,
    context: ExtractionContext,
    protection: ProtectionPolicy,
}

impl ProjectAnalyzer {
    /// Analyzer using the OXC extractor
    pub fn new(settings: Settings) -> Result<Self> {
        let context =
            ExtractionContext::new(&settings.project_root).parallel(settings.parallel);
        Self::with_context(settings, context)
    }

    /// Analyzer using a caller-supplied syntax extractor
    pub fn with_extractor(settings: Settings, extractor: Arc<dyn SourceExtractor>) -> Result<Self> {
        let context = ExtractionContext::with_extractor(&settings.project_root, extractor)
            .parallel(settings.parallel);
        Self::with_context(settings, context)
    }

    fn with_context(settings: Settings, context: ExtractionContext) -> Result<Self> {
        let scanner = TreeScanner::from_settings(&settings)?;
        let protection = ProtectionPolicy::new(&settings.entry_points, &settings.protected_patterns)?
            .with_backup_dir(&settings.backup_dir);

        Ok(Self {
            settings,
            scanner,
            context,
            protection,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scanner(&self) -> &TreeScanner {
        &self.scanner
    }

    pub fn context(&self) -> &ExtractionContext {
        &self.context
    }

    pub fn protection(&self) -> &ProtectionPolicy {
        &self.protection
    }

    /// Run a full analysis pass
    pub fn analyze(&self) -> Result<AnalysisResult> {
        self.analyze_with_progress(|_, _, _| {})
    }

    /// Run a full analysis pass, reporting `(current, total, message)`
    pub fn analyze_with_progress<F>(&self, progress_fn: F) -> Result<AnalysisResult>
    where
        F: Fn(usize, usize, &str),
    {
        let start_time = Instant::now();
        let root = self.scanner.root();

        // A previous pass may have cached lookups for files that are gone now.
        self.context.invalidate();

        progress_fn(0, 0, &format!("Scanning {}", root.display()));
        let paths = self.scanner.scan()?;

        let mut files: Vec<FileRecord> = paths
            .iter()
            .map(|p| FileRecord::new(p.clone(), self.scanner.file_info(p).size))
            .collect();
        let index: HashMap<PathBuf, usize> = paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        let code_files: Vec<PathBuf> = paths.iter().filter(|p| is_code_file(p)).cloned().collect();
        progress_fn(0, code_files.len(), "Extracting references");
        let extractions = self.context.extract_references(&code_files);

        let mut graph = UsageGraph::new();
        for path in &paths {
            graph.add_file(path);
        }

        let mut warnings: Vec<AnalysisWarning> = Vec::new();
        let mut import_edges: Vec<ImportEdge> = Vec::new();
        let mut code_texts: Vec<CodeText> = Vec::with_capacity(extractions.len());

        for (i, extraction) in extractions.into_iter().enumerate() {
            progress_fn(i + 1, code_files.len(), &extraction.path.to_string_lossy());
            warnings.extend(extraction.warnings);

            let importer = extraction.path;
            let Some(&importer_idx) = index.get(&importer) else {
                continue;
            };
            files[importer_idx].exports = extraction.syntax.export_names();

            for import in &extraction.syntax.imports {
                files[importer_idx].imports.push(import.specifier.clone());

                let Some(target) = self.context.resolve(&import.specifier, &importer) else {
                    continue;
                };
                let Some(&target_idx) = index.get(&target) else {
                    continue;
                };

                files[target_idx].add_referrer(&importer);
                if !self.settings.reachability_only {
                    files[target_idx].is_used = true;
                }
                if graph.add_import(&importer, &target) {
                    import_edges.push(ImportEdge {
                        from: importer.clone(),
                        to: target,
                        specifier: import.specifier.clone(),
                    });
                }
            }

            if let Some(text) = extraction.source {
                code_texts.push(CodeText {
                    path: importer,
                    text,
                });
            }
        }

        let entry_points: Vec<PathBuf> = self
            .settings
            .entry_points
            .iter()
            .map(PathBuf::from)
            .filter(|p| index.contains_key(p))
            .collect();

        let reached = graph.reachable_from(entry_points.iter().map(PathBuf::as_path));
        for path in &reached {
            if let Some(&idx) = index.get(path) {
                files[idx].is_used = true;
            }
        }

        progress_fn(code_files.len(), code_files.len(), "Checking asset references");
        self.mark_referenced_assets(&mut files, &index, &code_texts);

        progress_fn(code_files.len(), code_files.len(), "Checking package dependencies");
        let dependencies = self.analyze_dependencies(&code_texts, &mut warnings)?;

        let entry_set: HashSet<&PathBuf> = entry_points.iter().collect();
        let unused_files: Vec<PathBuf> = files
            .iter()
            .filter(|f| !f.is_used)
            .filter(|f| !entry_set.contains(&f.path))
            .filter(|f| !self.protection.is_protected(&f.path))
            .map(|f| f.path.clone())
            .collect();

        let unused_dependencies: Vec<String> = dependencies
            .iter()
            .filter(|d| !d.is_used)
            .map(|d| d.name.clone())
            .collect();

        let total_size = files.iter().map(|f| f.size).sum();
        let duration_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            files = files.len(),
            unused_files = unused_files.len(),
            unused_dependencies = unused_dependencies.len(),
            duration_ms,
            "analysis complete"
        );
        progress_fn(code_files.len(), code_files.len(), "Analysis complete");

        Ok(AnalysisResult {
            total_files: files.len(),
            total_size,
            files,
            dependencies,
            unused_files,
            unused_dependencies,
            entry_points,
            import_edges,
            warnings,
            analyzed_at: Utc::now(),
            duration_ms,
        })
    }

    /// Assets mentioned in code text count as used. With `reachability_only`
    /// only code that is itself used may vouch for an asset.
    fn mark_referenced_assets(
        &self,
        files: &mut [FileRecord],
        index: &HashMap<PathBuf, usize>,
        code_texts: &[CodeText],
    ) {
        let used_code: Vec<CodeText>;
        let sources: &[CodeText] = if self.settings.reachability_only {
            used_code = code_texts
                .iter()
                .filter(|c| index.get(&c.path).is_some_and(|&i| files[i].is_used))
                .cloned()
                .collect();
            &used_code
        } else {
            code_texts
        };

        let assets: Vec<usize> = files
            .iter()
            .enumerate()
            .filter(|(_, f)| is_asset_file(&f.path))
            .map(|(i, _)| i)
            .collect();

        for asset_idx in assets {
            let referrers =
                AssetReferenceScanner::referencing_files(&files[asset_idx].path, sources);
            if referrers.is_empty() {
                continue;
            }
            let asset = &mut files[asset_idx];
            asset.is_used = true;
            for referrer in &referrers {
                asset.add_referrer(referrer);
            }
        }
    }

    /// Dependency usage from the manifest. A missing manifest gives no
    /// dependencies; an unreadable or invalid one is reported as a warning.
    fn analyze_dependencies(
        &self,
        code_texts: &[CodeText],
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Result<Vec<DependencyRecord>> {
        let manifest_path = self.scanner.root().join(&self.settings.manifest_path);

        let manifest = match ManifestReader::read(&manifest_path) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                tracing::debug!(path = %manifest_path.display(), "no package manifest");
                return Ok(Vec::new());
            }
            Err(err) => {
                tracing::warn!("skipping dependency analysis: {}", err);
                warnings.push(AnalysisWarning::for_file(
                    &self.settings.manifest_path,
                    err.user_message(),
                ));
                return Ok(Vec::new());
            }
        };

        let mut records = manifest.dependency_records();
        for record in &mut records {
            let matcher = DependencyUsageMatcher::new(&record.name)?;
            record.usage_locations = matcher.usage_locations(code_texts);
            record.is_used = !record.usage_locations.is_empty();
        }

        Ok(records)
    }
}

/// Convenience for callers that only need a one-off analysis
pub fn analyze_project(project_root: &Path) -> Result<AnalysisResult> {
    ProjectAnalyzer::new(Settings::for_project(project_root))?.analyze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn settings(dir: &Path) -> Settings {
        Settings {
            build_command: None,
            parallel: false,
            ..Settings::for_project(dir)
        }
    }

    #[test]
    fn test_direct_import_marks_target_used() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.ts", "import './a';");
        write(dir.path(), "src/a.ts", "export const a = 1;");
        write(dir.path(), "src/orphan.ts", "import './leaf';");
        write(dir.path(), "src/leaf.ts", "export const leaf = 1;");

        let result = ProjectAnalyzer::new(settings(dir.path())).unwrap().analyze().unwrap();

        // leaf is imported by an unreachable file, which still counts
        assert_eq!(result.unused_files, vec![PathBuf::from("src/orphan.ts")]);
        let leaf = result.file(Path::new("src/leaf.ts")).unwrap();
        assert_eq!(leaf.referenced_by, vec![PathBuf::from("src/orphan.ts")]);
        assert_eq!(result.entry_points, vec![PathBuf::from("src/main.ts")]);
    }

    #[test]
    fn test_reachability_only_mode() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.ts", "import './a';");
        write(dir.path(), "src/a.ts", "export const a = 1;");
        write(dir.path(), "src/orphan.ts", "import './leaf';");
        write(dir.path(), "src/leaf.ts", "export const leaf = 1;");

        let mut settings = settings(dir.path());
        settings.reachability_only = true;
        let result = ProjectAnalyzer::new(settings).unwrap().analyze().unwrap();

        assert_eq!(
            result.unused_files,
            vec![PathBuf::from("src/leaf.ts"), PathBuf::from("src/orphan.ts")]
        );
    }

    #[test]
    fn test_invalid_manifest_is_warning() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.ts", "");
        write(dir.path(), "package.json", "{ nope");

        let result = ProjectAnalyzer::new(settings(dir.path())).unwrap().analyze().unwrap();
        assert!(result.dependencies.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, Some(PathBuf::from("package.json")));
    }

    #[test]
    fn test_progress_is_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.ts", "");
        write(dir.path(), "src/a.ts", "");

        let calls = std::cell::RefCell::new(Vec::new());
        ProjectAnalyzer::new(settings(dir.path()))
            .unwrap()
            .analyze_with_progress(|current, total, _| calls.borrow_mut().push((current, total)))
            .unwrap();

        let calls = calls.into_inner();
        assert!(calls.contains(&(1, 2)));
        assert_eq!(calls.last(), Some(&(2, 2)));
    }
}
