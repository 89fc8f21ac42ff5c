//! High-level cleanup workflow: analyze, detect, validate, remove, roll back

use crate::core::analyzer::ProjectAnalyzer;
use crate::core::remover::SafetyRemover;
use crate::core::validator::Validator;
use crate::error::Result;
use crate::models::analysis::{AnalysisResult, DetectionResult, ReviewItem, ReviewReason};
use crate::models::config::Settings;
use crate::models::removal::{
    RemovalDetails, RemovalHistory, RemovalReport, RemovalSummary, RemoveOptions, RollbackResult,
};
use crate::models::validation::PreRemovalValidation;
use crate::utils::to_slash;
use std::path::PathBuf;

/// Asked before deleting anything when `auto_confirm` is off
pub type ConfirmFn = Box<dyn Fn(&[PathBuf]) -> bool + Send + Sync>;

pub struct Pruner {
    settings: Settings,
    analyzer: ProjectAnalyzer,
    validator: Validator,
    remover: SafetyRemover,
    confirm: Option<ConfirmFn>,
}

impl Pruner {
    pub fn new(settings: Settings) -> Result<Self> {
        let analyzer = ProjectAnalyzer::new(settings.clone())?;
        let validator = Validator::new(&settings)?;
        let remover = SafetyRemover::new(&settings.project_root, &settings.backup_dir)?
            .with_protection(analyzer.protection().clone());

        Ok(Self {
            settings,
            analyzer,
            validator,
            remover,
            confirm: None,
        })
    }

    /// Install the confirmation prompt used when `auto_confirm` is off
    pub fn with_confirmation(mut self, confirm: ConfirmFn) -> Self {
        self.confirm = Some(confirm);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn analyzer(&self) -> &ProjectAnalyzer {
        &self.analyzer
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn analyze_project(&self) -> Result<AnalysisResult> {
        self.analyzer.analyze()
    }

    pub fn analyze_with_progress<F>(&self, progress_fn: F) -> Result<AnalysisResult>
    where
        F: Fn(usize, usize, &str),
    {
        self.analyzer.analyze_with_progress(progress_fn)
    }

    /// Analyze and split the unused files into safe and needs-review
    pub fn detect_unused_files(&self) -> Result<DetectionResult> {
        Ok(self.classify(self.analyze_project()?))
    }

    /// Split an existing analysis into safe and needs-review
    pub fn classify(&self, analysis: AnalysisResult) -> DetectionResult {
        let mut safe_to_remove = Vec::new();
        let mut requires_review = Vec::new();

        let index = analysis.file_index();
        for path in &analysis.unused_files {
            let Some(record) = index.get(path.as_path()) else {
                continue;
            };
            match ReviewReason::classify(record, self.settings.review_size_threshold) {
                Some(reason) => requires_review.push(ReviewItem {
                    file: path.clone(),
                    reason,
                    size: record.size,
                }),
                None => safe_to_remove.push(path.clone()),
            }
        }

        DetectionResult {
            unused_files: analysis.unused_files.clone(),
            analysis,
            safe_to_remove,
            requires_review,
        }
    }

    /// Remove unused files behind the validation gate
    ///
    /// Nothing is deleted if the gate or the confirmation fails. Per-file
    /// failures are reported and leave `success` false; nothing is rolled
    /// back automatically.
    pub fn remove_unused_files(&mut self, options: &RemoveOptions) -> Result<RemovalReport> {
        let detection = self.detect_unused_files()?;

        let mut candidates = detection.safe_to_remove.clone();
        if options.include_review_files {
            tracing::warn!(
                count = detection.requires_review.len(),
                "including files that require review"
            );
            candidates.extend(detection.requires_review.iter().map(|r| r.file.clone()));
        }

        let protection = self.analyzer.protection();
        candidates.retain(|p| {
            let protected = protection.is_protected(p);
            if protected {
                tracing::debug!(file = %p.display(), "protected, not removing");
            }
            !protected
        });

        let excludes = options
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let (mut skipped, candidates): (Vec<PathBuf>, Vec<PathBuf>) = candidates
            .into_iter()
            .partition(|p| excludes.iter().any(|pattern| pattern.matches(&to_slash(p))));
        if !skipped.is_empty() {
            tracing::info!(count = skipped.len(), "excluded by pattern");
        }

        let pre_validation = if options.skip_validation || candidates.is_empty() {
            None
        } else {
            Some(self.validator.pre_removal(&candidates, !options.dry_run)?)
        };
        let gate_passed = pre_validation.as_ref().is_none_or(|v| v.can_proceed);

        if !gate_passed {
            tracing::warn!("validation failed, aborting removal");
            skipped.extend(candidates);
            return Ok(self.refused(detection, skipped, pre_validation));
        }

        if options.dry_run {
            let space_saved = detection.analysis.size_of(&candidates);
            return Ok(RemovalReport {
                success: true,
                dry_run: true,
                summary: RemovalSummary {
                    total_analyzed: detection.analysis.total_files,
                    total_unused: detection.unused_files.len(),
                    total_removed: 0,
                    total_skipped: skipped.len(),
                    total_failed: 0,
                    space_saved,
                },
                details: RemovalDetails {
                    would_remove: candidates,
                    skipped,
                    requires_review: detection.requires_review,
                    ..RemovalDetails::default()
                },
                pre_validation,
                post_validation: None,
            });
        }

        if !options.auto_confirm && !candidates.is_empty() {
            if let Some(confirm) = &self.confirm {
                if !confirm(&candidates) {
                    tracing::info!("removal cancelled");
                    skipped.extend(candidates);
                    return Ok(self.refused(detection, skipped, pre_validation));
                }
            }
        }

        let batch = self.remover.remove_files(&candidates)?;

        let post_validation = if options.skip_validation || batch.successful.is_empty() {
            None
        } else {
            let post = self.validator.post_removal(&self.analyzer, &batch.successful)?;
            if !post.is_healthy {
                tracing::warn!("post-removal validation detected issues, consider rollback");
            }
            Some(post)
        };

        let space_saved = detection.analysis.size_of(&batch.successful);
        Ok(RemovalReport {
            success: batch.failed.is_empty(),
            dry_run: false,
            summary: RemovalSummary {
                total_analyzed: detection.analysis.total_files,
                total_unused: detection.unused_files.len(),
                total_removed: batch.successful.len(),
                total_skipped: skipped.len(),
                total_failed: batch.failed.len(),
                space_saved,
            },
            details: RemovalDetails {
                removed: batch.successful,
                would_remove: Vec::new(),
                skipped,
                failed: batch.failed,
                requires_review: detection.requires_review,
            },
            pre_validation,
            post_validation,
        })
    }

    fn refused(
        &self,
        detection: DetectionResult,
        skipped: Vec<PathBuf>,
        pre_validation: Option<PreRemovalValidation>,
    ) -> RemovalReport {
        RemovalReport {
            success: false,
            dry_run: false,
            summary: RemovalSummary {
                total_analyzed: detection.analysis.total_files,
                total_unused: detection.unused_files.len(),
                total_skipped: skipped.len(),
                ..RemovalSummary::default()
            },
            details: RemovalDetails {
                skipped,
                requires_review: detection.requires_review,
                ..RemovalDetails::default()
            },
            pre_validation,
            post_validation: None,
        }
    }

    /// Restore every backed-up file
    pub fn rollback_removal(&mut self) -> RollbackResult {
        let batch = self.remover.restore_all();
        tracing::info!(
            restored = batch.successful.len(),
            failed = batch.failed.len(),
            "rollback finished"
        );
        RollbackResult {
            success: batch.failed.is_empty(),
            restored: batch.successful,
            failed: batch.failed,
        }
    }

    pub fn removal_history(&self) -> Result<RemovalHistory> {
        Ok(RemovalHistory {
            removed_files: self.remover.removed_files(),
            backed_up_files: self.remover.backed_up_files()?,
            backup_dir: self.remover.backup_dir().to_path_buf(),
        })
    }

    /// Permanently delete the backups; rollback is impossible afterwards
    pub fn cleanup_backups(&mut self) -> Result<()> {
        self.remover.cleanup_backups()
    }
}
