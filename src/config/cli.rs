//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Settings-relevant command-line values, decoupled from clap
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub entry_points: Vec<String>,
    pub protect: Vec<String>,
    pub ignore: Vec<String>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub no_report: bool,
    pub reachability_only: bool,
    pub no_build: bool,
    pub build_timeout: Option<u64>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub no_parallel: bool,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            path: args.path.clone(),
            config: args.config.clone(),
            backup_dir: args.backup_dir.clone(),
            entry_points: args.entry_points.clone(),
            protect: args.protect.clone(),
            ignore: args.ignore.clone(),
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            report_file: args.report_file.clone(),
            no_report: args.no_report,
            reachability_only: args.reachability_only,
            no_build: args.no_build,
            build_timeout: args.build_timeout,
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            no_parallel: args.no_parallel,
        }
    }
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let mut settings = PartialSettings {
            project_root: args.path.clone(),
            backup_dir: args.backup_dir.clone(),
            entry_points: non_empty(&args.entry_points),
            protected_patterns: non_empty(&args.protect),
            exclude_patterns: non_empty(&args.ignore),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            report_file: args.report_file.clone(),
            build_timeout_secs: args.build_timeout,
            ..PartialSettings::default()
        };

        // Flags only override when set
        if args.reachability_only {
            settings.reachability_only = Some(true);
        }
        if args.no_build {
            settings.build_command = Some(Vec::new());
        }
        if args.quiet {
            settings.quiet = Some(true);
        }
        if args.verbose {
            settings.verbose = Some(true);
        }
        if args.no_colors {
            settings.use_colors = Some(false);
        }
        if args.no_progress {
            settings.show_progress = Some(false);
        }
        if args.no_parallel {
            settings.parallel = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
