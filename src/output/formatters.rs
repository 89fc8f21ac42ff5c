//! Output formatting functionality
//!
//! Text, JSON and CSV renderings of analysis, detection, removal and
//! rollback results.

use crate::error::{PrunerError, Result};
use crate::models::analysis::{AnalysisResult, DetectionResult};
use crate::models::removal::{RemovalHistory, RemovalReport, RollbackResult};
use crate::models::validation::{PostRemovalValidation, PreRemovalValidation};
use crate::utils::{format_bytes, to_slash};
use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;
use serde::Serialize;
use std::fmt::Write as _;

fn heading(title: &str, use_colors: bool) -> String {
    let underline = "=".repeat(title.chars().count());
    if use_colors {
        format!("{}\n{}\n", Cyan.bold().paint(title), underline)
    } else {
        format!("{}\n{}\n", title, underline)
    }
}

fn paint(text: &str, colour: ansi_term::Colour, use_colors: bool) -> String {
    if use_colors {
        colour.paint(text).to_string()
    } else {
        text.to_string()
    }
}

fn dimmed(text: &str, use_colors: bool) -> String {
    if use_colors {
        Style::new().dimmed().paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Format an analysis as text
pub fn format_analysis_text(result: &AnalysisResult, use_colors: bool, verbose: bool) -> String {
    let mut output = heading("Project Analysis", use_colors);

    let _ = writeln!(output, "Total files: {}", result.total_files);
    let _ = writeln!(output, "Total size: {}", format_bytes(result.total_size));
    let _ = writeln!(
        output,
        "Unused files: {} ({})",
        result.unused_files.len(),
        format_bytes(result.unused_size())
    );
    let _ = writeln!(
        output,
        "Dependencies: {} ({} unused)",
        result.dependencies.len(),
        result.unused_dependencies.len()
    );
    let _ = writeln!(output, "Analysis duration: {}ms", result.duration_ms);

    if !result.entry_points.is_empty() {
        output.push_str("\nEntry points:\n");
        for entry in &result.entry_points {
            let _ = writeln!(output, "  {}", paint(&to_slash(entry), Green, use_colors));
        }
    }

    if !result.unused_files.is_empty() {
        output.push_str("\nUnused files:\n");
        let index = result.file_index();
        for path in &result.unused_files {
            let size = index.get(path.as_path()).map(|f| f.size).unwrap_or_default();
            let _ = writeln!(
                output,
                "  {} {}",
                paint(&to_slash(path), Red, use_colors),
                dimmed(&format!("({})", format_bytes(size)), use_colors)
            );
        }
    }

    if !result.unused_dependencies.is_empty() {
        output.push_str("\nUnused dependencies:\n");
        for name in &result.unused_dependencies {
            let dev = result
                .dependencies
                .iter()
                .any(|d| &d.name == name && d.is_dev);
            let label = if dev { " (dev)" } else { "" };
            let _ = writeln!(output, "  {}{}", paint(name, Yellow, use_colors), label);
        }
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(
            output,
            "\n{}",
            paint(&format!("Warnings: {}", result.warnings.len()), Yellow, use_colors)
        );
        if verbose {
            for warning in &result.warnings {
                let _ = writeln!(output, "  {}", warning);
            }
        }
    }

    if verbose {
        output.push_str("\nFile usage:\n");
        for file in &result.files {
            let status = if file.is_used {
                paint("used", Green, use_colors)
            } else {
                paint("unused", Red, use_colors)
            };
            let _ = writeln!(output, "  [{}] {}", status, to_slash(&file.path));
            if !file.referenced_by.is_empty() {
                let referrers: Vec<String> = file.referenced_by.iter().map(|p| to_slash(p)).collect();
                let _ = writeln!(output, "      referenced by: {}", referrers.join(", "));
            }
        }

        if !result.dependencies.is_empty() {
            output.push_str("\nDependency usage:\n");
            for dep in &result.dependencies {
                let _ = writeln!(
                    output,
                    "  {} {} - {} file(s)",
                    paint(&dep.name, Blue, use_colors),
                    dimmed(&dep.version, use_colors),
                    dep.usage_locations.len()
                );
            }
        }
    }

    output
}

/// Format a detection result as text
pub fn format_detection_text(result: &DetectionResult, use_colors: bool, verbose: bool) -> String {
    let mut output = heading("Unused File Detection", use_colors);

    let _ = writeln!(output, "Files analyzed: {}", result.analysis.total_files);
    let _ = writeln!(output, "Unused files: {}", result.unused_files.len());
    let _ = writeln!(output, "Safe to remove: {}", result.safe_to_remove.len());
    let _ = writeln!(output, "Requires review: {}", result.requires_review.len());

    if !result.safe_to_remove.is_empty() {
        let _ = writeln!(output, "\n{}", paint("Safe to remove:", Green, use_colors));
        for path in &result.safe_to_remove {
            let _ = writeln!(output, "  {}", to_slash(path));
        }
    }

    if !result.requires_review.is_empty() {
        let _ = writeln!(output, "\n{}", paint("Requires review:", Yellow, use_colors));
        for item in &result.requires_review {
            let _ = writeln!(output, "  {}", to_slash(&item.file));
            let _ = writeln!(output, "      {}", dimmed(&item.reason.to_string(), use_colors));
        }
    }

    if verbose && !result.analysis.unused_dependencies.is_empty() {
        output.push_str("\nUnused dependencies:\n");
        for name in &result.analysis.unused_dependencies {
            let _ = writeln!(output, "  {}", name);
        }
    }

    output
}

fn format_pre_validation(validation: &PreRemovalValidation, use_colors: bool, output: &mut String) {
    let status = if validation.can_proceed {
        paint("passed", Green, use_colors)
    } else {
        paint("failed", Red, use_colors)
    };
    let _ = writeln!(output, "\nPre-removal validation: {}", status);

    for broken in &validation.reference.broken_references {
        let _ = writeln!(
            output,
            "  {} imports '{}' ({})",
            to_slash(&broken.imported_from),
            broken.missing_import,
            to_slash(&broken.file)
        );
    }
    if let Some(build) = &validation.build {
        let _ = writeln!(
            output,
            "  Build: {}",
            if build.can_build { "ok" } else { build.error.as_deref().unwrap_or("failed") }
        );
    }
    if !validation.recommendations.is_empty() {
        output.push_str("  Recommendations:\n");
        for rec in &validation.recommendations {
            let _ = writeln!(output, "    - {}", rec);
        }
    }
}

fn format_post_validation(validation: &PostRemovalValidation, use_colors: bool, output: &mut String) {
    if validation.is_healthy {
        let _ = writeln!(output, "\nPost-removal validation: {}", paint("healthy", Green, use_colors));
        return;
    }
    let _ = writeln!(
        output,
        "\nPost-removal validation: {}",
        paint("issues found, consider `pruner rollback`", Red, use_colors)
    );
    for issue in &validation.issues {
        let _ = writeln!(output, "  - {}", issue);
    }
}

/// Format a removal report as text
pub fn format_removal_text(report: &RemovalReport, use_colors: bool, verbose: bool) -> String {
    let title = if report.dry_run { "Removal Plan (dry run)" } else { "Removal Report" };
    let mut output = heading(title, use_colors);
    let summary = &report.summary;

    let _ = writeln!(output, "Files analyzed: {}", summary.total_analyzed);
    let _ = writeln!(output, "Unused files found: {}", summary.total_unused);
    if report.dry_run {
        let _ = writeln!(output, "Would remove: {}", report.details.would_remove.len());
        let _ = writeln!(output, "Space to free: {}", format_bytes(summary.space_saved));
    } else {
        let _ = writeln!(output, "Files removed: {}", summary.total_removed);
        let _ = writeln!(output, "Space saved: {}", format_bytes(summary.space_saved));
    }
    let _ = writeln!(output, "Files skipped: {}", summary.total_skipped);
    let _ = writeln!(output, "Files failed: {}", summary.total_failed);

    let lists = [
        ("Removed", &report.details.removed, Green),
        ("Would remove", &report.details.would_remove, Cyan),
        ("Skipped", &report.details.skipped, Yellow),
    ];
    for (label, paths, colour) in lists {
        if paths.is_empty() {
            continue;
        }
        let _ = writeln!(output, "\n{}:", paint(label, colour, use_colors));
        for path in paths {
            let _ = writeln!(output, "  {}", to_slash(path));
        }
    }

    if !report.details.failed.is_empty() {
        let _ = writeln!(output, "\n{}:", paint("Failed", Red, use_colors));
        for item in &report.details.failed {
            let _ = writeln!(output, "  {}: {}", to_slash(&item.file), item.error);
        }
    }

    if verbose && !report.details.requires_review.is_empty() {
        output.push_str("\nRequires review:\n");
        for item in &report.details.requires_review {
            let _ = writeln!(output, "  {}: {}", to_slash(&item.file), item.reason);
        }
    }

    if let Some(pre) = &report.pre_validation {
        format_pre_validation(pre, use_colors, &mut output);
    }
    if let Some(post) = &report.post_validation {
        format_post_validation(post, use_colors, &mut output);
    }

    let outcome = if report.success {
        paint("Completed successfully", Green, use_colors)
    } else {
        paint("Completed with problems", Red, use_colors)
    };
    let _ = writeln!(output, "\n{}", outcome);

    output
}

/// Format a rollback result as text
pub fn format_rollback_text(result: &RollbackResult, use_colors: bool) -> String {
    let mut output = heading("Rollback", use_colors);
    let _ = writeln!(output, "Restored: {}", result.restored.len());
    let _ = writeln!(output, "Failed: {}", result.failed.len());

    for path in &result.restored {
        let _ = writeln!(output, "  {} {}", paint("restored", Green, use_colors), to_slash(path));
    }
    for item in &result.failed {
        let _ = writeln!(
            output,
            "  {} {}: {}",
            paint("failed", Red, use_colors),
            to_slash(&item.file),
            item.error
        );
    }
    output
}

/// Format the removal history as text
pub fn format_history_text(history: &RemovalHistory, use_colors: bool) -> String {
    let mut output = heading("Removal History", use_colors);
    let _ = writeln!(output, "Backup directory: {}", to_slash(&history.backup_dir));
    let _ = writeln!(output, "Backed up files: {}", history.backed_up_files.len());

    if history.backed_up_files.is_empty() {
        output.push_str("\nNo backups found.\n");
    } else {
        output.push('\n');
        for path in &history.backed_up_files {
            let _ = writeln!(output, "  {}", to_slash(path));
        }
    }
    output
}

/// Serialize any result as JSON
pub fn format_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| PrunerError::JsonSerialize { source: e })
}

fn csv_rows<I>(header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PrunerError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PrunerError::CsvSerialize { source: e })
}

/// One row per scanned file
pub fn format_analysis_csv(result: &AnalysisResult) -> Result<String> {
    csv_rows(
        &["Path", "Size (bytes)", "Used", "Entry Point", "Referenced By", "Exports"],
        result.files.iter().map(|f| {
            vec![
                to_slash(&f.path),
                f.size.to_string(),
                f.is_used.to_string(),
                result.entry_points.contains(&f.path).to_string(),
                f.referenced_by.iter().map(|p| to_slash(p)).collect::<Vec<_>>().join(";"),
                f.exports.join(";"),
            ]
        }),
    )
}

/// One row per unused file
pub fn format_detection_csv(result: &DetectionResult) -> Result<String> {
    let index = result.analysis.file_index();
    let safe = result.safe_to_remove.iter().map(|p| {
        let size = index.get(p.as_path()).map(|f| f.size).unwrap_or_default();
        vec![to_slash(p), "safe".to_string(), String::new(), size.to_string()]
    });
    let review = result.requires_review.iter().map(|item| {
        vec![
            to_slash(&item.file),
            "review".to_string(),
            item.reason.to_string(),
            item.size.to_string(),
        ]
    });
    csv_rows(&["Path", "Status", "Reason", "Size (bytes)"], safe.chain(review))
}

/// One row per file touched by a removal
pub fn format_removal_csv(report: &RemovalReport) -> Result<String> {
    let details = &report.details;
    let tagged = |paths: &[std::path::PathBuf], status: &str| -> Vec<Vec<String>> {
        paths
            .iter()
            .map(|p| vec![to_slash(p), status.to_string(), String::new()])
            .collect()
    };

    let mut rows = tagged(&details.removed, "removed");
    rows.extend(tagged(&details.would_remove, "would_remove"));
    rows.extend(tagged(&details.skipped, "skipped"));
    rows.extend(
        details
            .failed
            .iter()
            .map(|f| vec![to_slash(&f.file), "failed".to_string(), f.error.clone()]),
    );
    csv_rows(&["Path", "Status", "Detail"], rows)
}

/// One row per restored or failed file
pub fn format_rollback_csv(result: &RollbackResult) -> Result<String> {
    let restored = result
        .restored
        .iter()
        .map(|p| vec![to_slash(p), "restored".to_string(), String::new()]);
    let failed = result
        .failed
        .iter()
        .map(|f| vec![to_slash(&f.file), "failed".to_string(), f.error.clone()]);
    csv_rows(&["Path", "Status", "Error"], restored.chain(failed))
}

/// One row per backed-up file
pub fn format_history_csv(history: &RemovalHistory) -> Result<String> {
    csv_rows(
        &["Path", "Backup Path"],
        history.backed_up_files.iter().map(|p| {
            vec![to_slash(p), to_slash(&history.backup_dir.join(p))]
        }),
    )
}
