//! Command-line argument parsing

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pruner - find and safely remove unused files from a JS/TS project
#[derive(Parser, Debug)]
#[command(name = "pruner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find and safely remove unused files and dependencies in JavaScript/TypeScript projects")]
#[command(long_about = "Pruner builds an import graph of a JavaScript/TypeScript project starting from its entry points, \
reports files and package dependencies that nothing uses, and removes unused files behind a validation gate. \
Every removed file is backed up first and can be restored with `pruner rollback`.")]
#[command(after_help = "EXAMPLES:

    # Analyze the current project and write cleanup-analysis-report.json
    pruner analyze

    # Split unused files into safe-to-remove and needs-review
    pruner detect --path ./my-app

    # Show what would be removed without touching anything
    pruner remove --dry-run

    # Remove without prompting, keeping anything under src/legacy
    pruner remove --yes --exclude 'src/legacy/**'

    # Skip the build step during validation
    pruner --no-build remove

    # Restore everything that was removed
    pruner rollback

    # Export the import graph for Graphviz
    pruner analyze --graph-output usage.dot
")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root to analyze
    #[arg(short, long, global = true, value_name = "PATH", help = "Project root (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to configuration file (defaults to .pruner.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Backup directory
    #[arg(long, global = true, value_name = "DIR", help = "Backup directory relative to the project root (default: .cleanup-backup)")]
    pub backup_dir: Option<PathBuf>,

    /// Entry points
    #[arg(long = "entry", global = true, value_name = "FILE", help = "Entry point relative to the project root (can be specified multiple times; replaces the defaults)")]
    pub entry_points: Vec<String>,

    /// Additional protected patterns
    #[arg(long = "protect", global = true, value_name = "PATTERN", help = "Glob pattern of files that must never be removed (can be specified multiple times)")]
    pub protect: Vec<String>,

    /// Scan excludes
    #[arg(long = "ignore", global = true, value_name = "PATTERN", help = "Glob pattern of files or directories to leave out of the scan (can be specified multiple times)")]
    pub ignore: Vec<String>,

    /// Output format (text, json, csv)
    #[arg(short, long, global = true, value_enum, help = "Output format: 'text' for humans, 'json' for machine processing, 'csv' for spreadsheets")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, global = true, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// JSON report written by `analyze`
    #[arg(long, global = true, value_name = "FILE", help = "Where `analyze` writes its JSON report (default: cleanup-analysis-report.json)")]
    pub report_file: Option<PathBuf>,

    /// Don't write the analysis report
    #[arg(long, global = true, help = "Do not write the JSON analysis report")]
    pub no_report: bool,

    /// DOT export of the import graph
    #[arg(long, global = true, value_name = "FILE", help = "Write the import graph in Graphviz DOT format")]
    pub graph_output: Option<PathBuf>,

    /// Only count files reachable from an entry point as used
    #[arg(long, global = true, help = "Treat a file as used only if it is reachable from an entry point")]
    pub reachability_only: bool,

    /// Skip the build during validation
    #[arg(long, global = true, help = "Skip running the project build during validation")]
    pub no_build: bool,

    /// Build timeout
    #[arg(long, global = true, value_name = "SECS", help = "Kill the validation build after this many seconds")]
    pub build_timeout: Option<u64>,

    /// Suppress non-essential output
    #[arg(short, long, global = true, help = "Suppress non-essential output")]
    pub quiet: bool,

    /// Show detailed information
    #[arg(short, long, global = true, help = "Show per-file details and debug logging")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, global = true, help = "Disable progress bars (useful for CI environments)")]
    pub no_progress: bool,

    /// Disable parallel processing
    #[arg(long, global = true, help = "Read and parse files on a single thread")]
    pub no_parallel: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Analyze the project and report unused files and dependencies
    Analyze,
    /// Split unused files into safe-to-remove and needs-review
    Detect,
    /// Remove unused files after validation, backing each one up
    Remove(RemoveArgs),
    /// Restore every backed-up file
    Rollback,
    /// List files held in the backup directory
    History,
    /// Permanently delete the backup directory
    CleanupBackups {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a default .pruner.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options of the `remove` subcommand
#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveArgs {
    /// Report what would be removed without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Skip pre- and post-removal validation
    #[arg(long)]
    pub skip_validation: bool,

    /// Also remove files that were flagged for review
    #[arg(long)]
    pub include_review: bool,

    /// Keep files matching this glob pattern (can be specified multiple times)
    #[arg(short, long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// The subcommand, `analyze` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Analyze)
    }
}
