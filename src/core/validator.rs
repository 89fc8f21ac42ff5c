//! Pre- and post-removal validation
//!
//! The reference check simulates a removal: candidates are dropped from the
//! scanned tree and every surviving code file is re-extracted. Any import that
//! still resolves into the candidate set rejects the whole batch.

use crate::core::analyzer::ProjectAnalyzer;
use crate::core::build::BuildCommand;
use crate::core::scanner::{is_code_file, TreeScanner};
use crate::error::Result;
use crate::models::config::Settings;
use crate::models::file_record::ImportedModule;
use crate::models::validation::{
    BrokenReference, BuildValidation, PostRemovalValidation, PreRemovalValidation,
    ReferenceValidation,
};
use crate::parsers::ast_parser::ExtractionContext;
use crate::utils::normalize_relative;
use crate::utils::path_resolver::RESOLVE_EXTENSIONS;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct Validator {
    scanner: TreeScanner,
    context: ExtractionContext,
    build: Option<BuildCommand>,
}

impl Validator {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            scanner: TreeScanner::from_settings(settings)?,
            context: ExtractionContext::new(&settings.project_root).parallel(settings.parallel),
            build: BuildCommand::from_settings(settings),
        })
    }

    /// Replace the build step; `None` disables build validation
    pub fn with_build(mut self, build: Option<BuildCommand>) -> Self {
        self.build = build;
        self
    }

    pub fn build_command(&self) -> Option<&BuildCommand> {
        self.build.as_ref()
    }

    /// Check that no surviving file imports one of `candidates`
    ///
    /// Relative imports that resolve nowhere are reported as warnings; they
    /// exist regardless of the candidate set and do not fail the check.
    pub fn validate_removal(&self, candidates: &[PathBuf]) -> Result<ReferenceValidation> {
        self.context.invalidate();

        let removing: HashSet<&Path> = candidates.iter().map(PathBuf::as_path).collect();
        let remaining: Vec<PathBuf> = self
            .scanner
            .scan()?
            .into_iter()
            .filter(|p| !removing.contains(p.as_path()))
            .filter(|p| is_code_file(p))
            .collect();

        let mut broken_references = Vec::new();
        let mut warnings = Vec::new();

        for extraction in self.context.extract_references(&remaining) {
            for warning in &extraction.warnings {
                warnings.push(warning.to_string());
            }

            for import in relative_imports(&extraction.syntax.imports) {
                match self.context.resolve(&import.specifier, &extraction.path) {
                    Some(target) if removing.contains(target.as_path()) => {
                        broken_references.push(BrokenReference {
                            file: target,
                            missing_import: import.specifier.clone(),
                            imported_from: extraction.path.clone(),
                        });
                    }
                    Some(_) => {}
                    None => warnings.push(format!(
                        "Potentially broken import in {}: {}",
                        extraction.path.display(),
                        import.specifier
                    )),
                }
            }
        }

        if !broken_references.is_empty() {
            tracing::warn!(
                broken = broken_references.len(),
                "removal would break surviving imports"
            );
        }

        Ok(ReferenceValidation {
            is_valid: broken_references.is_empty(),
            broken_references,
            warnings,
        })
    }

    /// Run the configured build; `None` when no build command is configured
    pub fn validate_build(&self) -> Result<Option<BuildValidation>> {
        match &self.build {
            Some(command) => command.run().map(Some),
            None => {
                tracing::debug!("no build command configured, skipping build validation");
                Ok(None)
            }
        }
    }

    /// Gate evaluated before deleting `candidates`
    ///
    /// The build only runs when `run_build` is set and the reference check
    /// passed.
    pub fn pre_removal(&self, candidates: &[PathBuf], run_build: bool) -> Result<PreRemovalValidation> {
        let reference = self.validate_removal(candidates)?;
        let build = if run_build && reference.is_valid {
            self.validate_build()?
        } else {
            None
        };

        let build_ok = build.as_ref().is_none_or(|b| b.can_build);
        let can_proceed = reference.is_valid && build_ok;

        let mut recommendations = Vec::new();
        for broken in &reference.broken_references {
            recommendations.push(format!(
                "Keep {}: still imported by {} as '{}'",
                broken.file.display(),
                broken.imported_from.display(),
                broken.missing_import
            ));
        }
        if let Some(build) = build.as_ref().filter(|b| !b.can_build) {
            if build.timed_out {
                recommendations.push(
                    "Build timed out; raise build_timeout_secs or run with --no-build".to_string(),
                );
            } else {
                recommendations.push("Fix the failing build before removing files".to_string());
            }
        }
        if !reference.warnings.is_empty() {
            recommendations.push(format!(
                "Review {} existing import warning(s) before removal",
                reference.warnings.len()
            ));
        }

        Ok(PreRemovalValidation {
            can_proceed,
            reference,
            build,
            recommendations,
        })
    }

    /// Health check after `removed` were deleted
    ///
    /// Unhealthy when the build fails or a relative import points at one of
    /// the removed files. Unrelated unresolved imports are not counted.
    pub fn post_removal(
        &self,
        analyzer: &ProjectAnalyzer,
        removed: &[PathBuf],
    ) -> Result<PostRemovalValidation> {
        let analysis = analyzer.analyze()?;
        let removed_set: HashSet<&Path> = removed.iter().map(PathBuf::as_path).collect();

        let mut issues = Vec::new();
        for file in &analysis.files {
            if !is_code_file(&file.path) {
                continue;
            }
            let from_dir = file.path.parent().unwrap_or_else(|| Path::new(""));
            for specifier in file.imports.iter().filter(|s| s.starts_with('.')) {
                if analyzer.context().resolve(specifier, &file.path).is_some() {
                    continue;
                }
                if let Some(target) = removed_target(from_dir, specifier, &removed_set) {
                    issues.push(format!(
                        "{} imports removed file {} ('{}')",
                        file.path.display(),
                        target.display(),
                        specifier
                    ));
                }
            }
        }

        let build = self.validate_build()?;
        if let Some(build) = build.as_ref().filter(|b| !b.can_build) {
            issues.push(format!(
                "Build failed after removal: {}",
                build.error.as_deref().unwrap_or("unknown error")
            ));
        }

        if !issues.is_empty() {
            tracing::warn!(issues = issues.len(), "post-removal validation found issues");
        }

        Ok(PostRemovalValidation {
            is_healthy: issues.is_empty(),
            remaining_unused: analysis.unused_files,
            build,
            issues,
        })
    }
}

fn relative_imports(imports: &[ImportedModule]) -> impl Iterator<Item = &ImportedModule> {
    imports.iter().filter(|i| i.is_relative())
}

/// The removed file a now-dangling specifier would have resolved to
fn removed_target(from_dir: &Path, specifier: &str, removed: &HashSet<&Path>) -> Option<PathBuf> {
    let base = normalize_relative(&from_dir.join(specifier))?;
    let base_str = base.to_string_lossy().to_string();

    let mut candidates = vec![base.clone()];
    candidates.extend(RESOLVE_EXTENSIONS.iter().map(|ext| PathBuf::from(format!("{}{}", base_str, ext))));
    candidates.extend(RESOLVE_EXTENSIONS.iter().map(|ext| base.join(format!("index{}", ext))));

    candidates.into_iter().find(|c| removed.contains(c.as_path()))
}
