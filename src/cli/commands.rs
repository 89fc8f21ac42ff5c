//! Command implementations

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::{Args, Commands, RemoveArgs};
use crate::config::{load_config, parser, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{ProjectAnalyzer, Pruner};
use crate::error::{try_with_recovery, ErrorSeverity, PrunerError, Result};
use crate::models::config::Settings;
use crate::models::removal::RemoveOptions;
use crate::output::{
    create_formatter, create_progress_callback, create_writer, save_report, FileWriter, Formatter,
    OutputWriter, ProgressReporter,
};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the project and report unused files and dependencies
    Analyze(Args),
    /// Split unused files into safe and needs-review
    Detect(Args),
    /// Remove unused files behind the validation gate
    Remove(Args, RemoveArgs),
    /// Restore backed-up files
    Rollback(Args),
    /// List backed-up files
    History(Args),
    /// Delete the backup directory
    CleanupBackups { args: Args, yes: bool },
    /// Initialize a default configuration file
    Init { force: bool },
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        match args.command() {
            Commands::Analyze => Command::Analyze(args),
            Commands::Detect => Command::Detect(args),
            Commands::Remove(remove) => Command::Remove(args, remove),
            Commands::Rollback => Command::Rollback(args),
            Commands::History => Command::History(args),
            Commands::CleanupBackups { yes } => Command::CleanupBackups { args, yes },
            Commands::Init { force } => Command::Init { force },
        }
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => analyze(args),
            Command::Detect(args) => detect(args),
            Command::Remove(args, remove) => remove_files(args, remove),
            Command::Rollback(args) => rollback(args),
            Command::History(args) => history(args),
            Command::CleanupBackups { args, yes } => cleanup_backups(args, *yes),
            Command::Init { force } => init(*force),
        }
    }

    /// Run the command and map its outcome to a process exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(_) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());

                match err.severity() {
                    ErrorSeverity::Warning => 0,
                    ErrorSeverity::Error => 1,
                    ErrorSeverity::Critical => 2,
                }
            }
        }
    }
}

/// Merge config sources and install logging
fn load_settings(args: &Args) -> Result<Settings> {
    let settings = load_config(CliArgs::from(args))?;
    crate::logging::initialize(&settings);
    tracing::debug!(?settings, "configuration loaded");
    Ok(settings)
}

fn formatter_for(settings: &Settings) -> Box<dyn Formatter> {
    create_formatter(
        settings.output_format,
        settings.use_colors,
        settings.verbose,
        settings.quiet,
    )
}

fn emit(settings: &Settings, content: &str) -> Result<()> {
    create_writer(settings.output_file.as_ref()).write(content)
}

fn progress_reporter(settings: &Settings) -> Arc<ProgressReporter> {
    Arc::new(ProgressReporter::new(
        settings.quiet || !settings.show_progress,
        settings.verbose,
    ))
}

fn analyze(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let analyzer = ProjectAnalyzer::new(settings.clone())?;

    let reporter = progress_reporter(&settings);
    reporter.start(0, &format!("Analyzing {}", settings.project_root.display()));
    let analysis = analyzer.analyze_with_progress(create_progress_callback(reporter.clone()))?;
    reporter.finish(&format!(
        "Analyzed {} files in {}ms",
        analysis.total_files, analysis.duration_ms
    ));

    emit(&settings, &formatter_for(&settings).format_analysis(&analysis)?)?;

    // Side files are best-effort
    if !args.no_report {
        if let Some(report_file) = &settings.report_file {
            let path = settings.project_root.join(report_file);
            if try_with_recovery(|| save_report(&path, &analysis))?.is_some() {
                reporter.print(&format!("Report saved to {}", path.display()));
            }
        }
    }

    if let Some(graph_path) = &args.graph_output {
        let dot = analysis
            .usage_graph()
            .to_dot(&analysis.entry_points, &analysis.unused_files);
        if try_with_recovery(|| FileWriter::new(graph_path).write(&dot))?.is_some() {
            reporter.print(&format!("Import graph written to {}", graph_path.display()));
        }
    }

    Ok(())
}

fn detect(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let pruner = Pruner::new(settings.clone())?;

    let reporter = progress_reporter(&settings);
    reporter.start(0, "Detecting unused files");
    let analysis = pruner.analyze_with_progress(create_progress_callback(reporter.clone()))?;
    let detection = pruner.classify(analysis);
    reporter.finish(&format!(
        "{} unused files, {} need review",
        detection.unused_files.len(),
        detection.requires_review.len()
    ));

    emit(&settings, &formatter_for(&settings).format_detection(&detection)?)
}

fn remove_files(args: &Args, remove: &RemoveArgs) -> Result<()> {
    let settings = load_settings(args)?;
    let mut pruner = Pruner::new(settings.clone())?;
    let prompting = !remove.yes && !remove.dry_run;
    if prompting {
        pruner = pruner.with_confirmation(Box::new(prompt_removal));
    }

    let options = RemoveOptions {
        dry_run: remove.dry_run,
        skip_validation: remove.skip_validation,
        include_review_files: remove.include_review,
        exclude_patterns: remove.exclude.clone(),
        auto_confirm: remove.yes,
    };

    let reporter = progress_reporter(&settings);
    // A spinner would draw over the confirmation prompt
    let spinner = if prompting {
        None
    } else if remove.dry_run {
        reporter.create_spinner("Planning removal")
    } else {
        reporter.create_spinner("Validating and removing unused files")
    };
    let report = pruner.remove_unused_files(&options);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = report?;

    emit(&settings, &formatter_for(&settings).format_removal(&report)?)?;

    if report.success {
        if !report.dry_run && !report.details.removed.is_empty() {
            reporter.print(&format!(
                "Backups kept in {}; run `pruner rollback` to restore",
                settings.backup_root().display()
            ));
        }
        Ok(())
    } else {
        Err(PrunerError::incomplete(
            "Removal",
            format!(
                "{} failed, {} skipped",
                report.summary.total_failed, report.summary.total_skipped
            ),
        ))
    }
}

fn rollback(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let mut pruner = Pruner::new(settings.clone())?;

    let result = pruner.rollback_removal();
    emit(&settings, &formatter_for(&settings).format_rollback(&result)?)?;

    if result.success {
        Ok(())
    } else {
        Err(PrunerError::incomplete(
            "Rollback",
            format!("{} file(s) could not be restored", result.failed.len()),
        ))
    }
}

fn history(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let pruner = Pruner::new(settings.clone())?;

    let history = pruner.removal_history()?;
    emit(&settings, &formatter_for(&settings).format_history(&history)?)
}

fn cleanup_backups(args: &Args, yes: bool) -> Result<()> {
    let settings = load_settings(args)?;
    let mut pruner = Pruner::new(settings.clone())?;
    let backup_root = settings.backup_root();

    let question = format!(
        "Permanently delete {}? Removed files can no longer be restored.",
        backup_root.display()
    );
    if !yes && !confirm(&question) {
        eprintln!("Cleanup cancelled");
        return Ok(());
    }

    pruner.cleanup_backups()?;
    if !settings.quiet {
        println!("Deleted backup directory {}", backup_root.display());
    }
    Ok(())
}

fn init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

    if config_path.exists() && !force {
        println!("Configuration file already exists at: {}", config_path.display());
        println!("Run `pruner init --force` to overwrite it.");
        return Ok(());
    }

    parser::create_default_config(&config_path)?;

    println!("Created default configuration file at: {}", config_path.display());
    println!("\nEdit it to set entry points, protected patterns and the build command.");
    println!("Settings can also be given as PRUNER_* environment variables or on the command line.");
    Ok(())
}

/// Ask on stderr before removing `files`
fn prompt_removal(files: &[PathBuf]) -> bool {
    eprintln!("The following {} file(s) will be removed:", files.len());
    for file in files {
        eprintln!("  {}", display_path(file));
    }
    confirm(&format!("Remove {} file(s)?", files.len()))
}

/// Interactive yes/no question; non-interactive stdin always declines
fn confirm(question: &str) -> bool {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        eprintln!("{} stdin is not a terminal; pass --yes to proceed.", question);
        return false;
    }

    eprint!("{} [y/N] ", question);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn display_path(path: &Path) -> String {
    crate::utils::to_slash(path)
}
