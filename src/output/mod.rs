//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;
#[cfg(test)]
mod tests;

pub use self::formatters::format_json;
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, save_report, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::{AnalysisResult, DetectionResult};
use crate::models::config::OutputFormat;
use crate::models::removal::{RemovalHistory, RemovalReport, RollbackResult};

/// Trait for different output formatters
pub trait Formatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String>;

    fn format_detection(&self, result: &DetectionResult) -> Result<String>;

    fn format_removal(&self, report: &RemovalReport) -> Result<String>;

    fn format_rollback(&self, result: &RollbackResult) -> Result<String>;

    fn format_history(&self, history: &RemovalHistory) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        // Quiet mode prints one unused path per line, suitable for piping
        if self.quiet {
            return Ok(result
                .unused_files
                .iter()
                .map(|p| format!("{}\n", crate::utils::to_slash(p)))
                .collect());
        }
        Ok(formatters::format_analysis_text(result, self.use_colors, self.verbose))
    }

    fn format_detection(&self, result: &DetectionResult) -> Result<String> {
        if self.quiet {
            return Ok(format!(
                "Unused: {}, safe: {}, review: {}\n",
                result.unused_files.len(),
                result.safe_to_remove.len(),
                result.requires_review.len()
            ));
        }
        Ok(formatters::format_detection_text(result, self.use_colors, self.verbose))
    }

    fn format_removal(&self, report: &RemovalReport) -> Result<String> {
        if self.quiet {
            return Ok(format!(
                "Removed: {}, skipped: {}, failed: {}\n",
                report.summary.total_removed, report.summary.total_skipped, report.summary.total_failed
            ));
        }
        Ok(formatters::format_removal_text(report, self.use_colors, self.verbose))
    }

    fn format_rollback(&self, result: &RollbackResult) -> Result<String> {
        if self.quiet {
            return Ok(format!(
                "Restored: {}, failed: {}\n",
                result.restored.len(),
                result.failed.len()
            ));
        }
        Ok(formatters::format_rollback_text(result, self.use_colors))
    }

    fn format_history(&self, history: &RemovalHistory) -> Result<String> {
        Ok(formatters::format_history_text(history, self.use_colors))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        format_json(result, self.pretty)
    }

    fn format_detection(&self, result: &DetectionResult) -> Result<String> {
        format_json(result, self.pretty)
    }

    fn format_removal(&self, report: &RemovalReport) -> Result<String> {
        format_json(report, self.pretty)
    }

    fn format_rollback(&self, result: &RollbackResult) -> Result<String> {
        format_json(result, self.pretty)
    }

    fn format_history(&self, history: &RemovalHistory) -> Result<String> {
        format_json(history, self.pretty)
    }
}

/// CSV formatter for spreadsheet analysis
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        formatters::format_analysis_csv(result)
    }

    fn format_detection(&self, result: &DetectionResult) -> Result<String> {
        formatters::format_detection_csv(result)
    }

    fn format_removal(&self, report: &RemovalReport) -> Result<String> {
        formatters::format_removal_csv(report)
    }

    fn format_rollback(&self, result: &RollbackResult) -> Result<String> {
        formatters::format_rollback_csv(result)
    }

    fn format_history(&self, history: &RemovalHistory) -> Result<String> {
        formatters::format_history_csv(history)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
