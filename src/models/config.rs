//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory name for removed-file backups
pub const DEFAULT_BACKUP_DIR: &str = ".cleanup-backup";

/// Default file name for the persisted analysis report
pub const DEFAULT_REPORT_FILE: &str = "cleanup-analysis-report.json";

/// Files above this size are flagged for manual review
pub const DEFAULT_REVIEW_SIZE_THRESHOLD: u64 = 100 * 1024;

/// Main configuration settings for pruner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the project to analyze
    pub project_root: PathBuf,

    /// Backup directory, relative to the project root
    pub backup_dir: PathBuf,

    /// Package manifest, relative to the project root
    pub manifest_path: PathBuf,

    /// Files that are always considered used and seed the reachability closure
    pub entry_points: Vec<String>,

    /// Extra glob patterns excluded from scanning
    pub exclude_patterns: Vec<String>,

    /// Extra glob patterns that are never removed
    pub protected_patterns: Vec<String>,

    /// File extensions the scanner keeps
    pub include_extensions: Vec<String>,

    /// Size in bytes above which an unused file requires review
    pub review_size_threshold: u64,

    /// Only reachability from entry points decides usage
    pub reachability_only: bool,

    /// Build command used for validation; `None` skips build validation
    pub build_command: Option<Vec<String>>,

    /// Kill the build after this many seconds
    pub build_timeout_secs: Option<u64>,

    /// Whether to read and parse files in parallel
    pub parallel: bool,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Where `analyze` saves the JSON report, relative to the project root
    pub report_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed output
    pub verbose: bool,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Settings {
    /// Settings rooted at `project_root` with every other field defaulted
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Absolute location of the backup directory
    pub fn backup_root(&self) -> PathBuf {
        self.project_root.join(&self.backup_dir)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            manifest_path: PathBuf::from("package.json"),
            entry_points: default_entry_points(),
            exclude_patterns: Vec::new(),
            protected_patterns: Vec::new(),
            include_extensions: default_include_extensions(),
            review_size_threshold: DEFAULT_REVIEW_SIZE_THRESHOLD,
            reachability_only: false,
            build_command: Some(vec![
                "npm".to_string(),
                "run".to_string(),
                "build".to_string(),
            ]),
            build_timeout_secs: None,
            parallel: true,
            output_format: OutputFormat::Text,
            output_file: None,
            report_file: Some(PathBuf::from(DEFAULT_REPORT_FILE)),
            use_colors: true,
            show_progress: true,
            quiet: false,
            verbose: false,
            log_level: "warn".to_string(),
        }
    }
}

/// Entry points of a typical Vite/React project
pub fn default_entry_points() -> Vec<String> {
    [
        "src/main.tsx",
        "src/main.ts",
        "src/index.tsx",
        "src/index.ts",
        "src/App.tsx",
        "src/App.ts",
        "index.html",
        "vite.config.ts",
        "vite.config.js",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Extensions considered by the tree scanner
pub fn default_include_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "json", "css", "scss", "html"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
///
/// `build_command = []` in a config file disables build validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub project_root: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub entry_points: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub protected_patterns: Option<Vec<String>>,
    pub include_extensions: Option<Vec<String>>,
    pub review_size_threshold: Option<u64>,
    pub reachability_only: Option<bool>,
    pub build_command: Option<Vec<String>>,
    pub build_timeout_secs: Option<u64>,
    pub parallel: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub log_level: Option<String>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        take!(
            project_root,
            backup_dir,
            manifest_path,
            entry_points,
            exclude_patterns,
            protected_patterns,
            include_extensions,
            review_size_threshold,
            reachability_only,
            build_command,
            build_timeout_secs,
            parallel,
            output_format,
            output_file,
            report_file,
            use_colors,
            show_progress,
            quiet,
            verbose,
            log_level,
        );
    }

    /// Convert to full Settings using defaults for missing values
    pub fn to_settings(&self) -> Settings {
        let defaults = Settings::default();

        Settings {
            project_root: self.project_root.clone().unwrap_or(defaults.project_root),
            backup_dir: self.backup_dir.clone().unwrap_or(defaults.backup_dir),
            manifest_path: self.manifest_path.clone().unwrap_or(defaults.manifest_path),
            entry_points: self.entry_points.clone().unwrap_or(defaults.entry_points),
            exclude_patterns: self.exclude_patterns.clone().unwrap_or(defaults.exclude_patterns),
            protected_patterns: self
                .protected_patterns
                .clone()
                .unwrap_or(defaults.protected_patterns),
            include_extensions: self
                .include_extensions
                .clone()
                .unwrap_or(defaults.include_extensions),
            review_size_threshold: self
                .review_size_threshold
                .unwrap_or(defaults.review_size_threshold),
            reachability_only: self.reachability_only.unwrap_or(defaults.reachability_only),
            build_command: match &self.build_command {
                Some(command) if command.is_empty() => None,
                Some(command) => Some(command.clone()),
                None => defaults.build_command,
            },
            build_timeout_secs: self.build_timeout_secs.or(defaults.build_timeout_secs),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            output_file: self.output_file.clone().or(defaults.output_file),
            report_file: self.report_file.clone().or(defaults.report_file),
            use_colors: self.use_colors.unwrap_or(defaults.use_colors),
            show_progress: self.show_progress.unwrap_or(defaults.show_progress),
            quiet: self.quiet.unwrap_or(defaults.quiet),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = PartialSettings {
            quiet: Some(false),
            review_size_threshold: Some(10),
            ..Default::default()
        };
        base.merge_from(PartialSettings {
            quiet: Some(true),
            ..Default::default()
        });

        assert_eq!(base.quiet, Some(true));
        assert_eq!(base.review_size_threshold, Some(10));
    }

    #[test]
    fn test_empty_build_command_disables_build() {
        let partial = PartialSettings {
            build_command: Some(Vec::new()),
            ..Default::default()
        };
        assert!(partial.to_settings().build_command.is_none());
        assert!(PartialSettings::default().to_settings().build_command.is_some());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
