//! Progress reporting for long-running operations
//!
//! Bars are drawn on stderr so that stdout stays clean for formatted output.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    multi_progress: Arc<MultiProgress>,
    main_progress_bar: Option<ProgressBar>,
    message_bar: Option<ProgressBar>,
    current_operation: Mutex<String>,
}

impl ProgressReporter {
    /// Reporter that draws nothing when `quiet` is set
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let multi_progress = Arc::new(MultiProgress::with_draw_target(ProgressDrawTarget::stderr()));

        let (main_progress_bar, message_bar) = if quiet {
            (None, None)
        } else {
            let main_bar = multi_progress.add(ProgressBar::new(0));
            main_bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );

            let msg_bar = multi_progress.add(ProgressBar::new(1));
            msg_bar.set_style(
                ProgressStyle::default_bar()
                    .template("{wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            (Some(main_bar), Some(msg_bar))
        };

        Self {
            quiet,
            verbose,
            multi_progress,
            main_progress_bar,
            message_bar,
            current_operation: Mutex::new(String::new()),
        }
    }

    /// Start a new operation with `total` steps
    pub fn start(&self, total: usize, operation: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_position(0);
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.set_message(operation.to_string());
        }
        *self.current_operation.lock() = operation.to_string();

        if self.verbose {
            tracing::info!("starting: {}", operation);
        }
    }

    pub fn update(&self, current: usize, total: usize, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
        }

        let mut current_op = self.current_operation.lock();
        if message != *current_op {
            if let Some(msg_bar) = &self.message_bar {
                msg_bar.set_message(message.to_string());
            }
            *current_op = message.to_string();
        }

        if self.verbose {
            tracing::debug!("[{}/{}] {}", current, total, message);
        }
    }

    pub fn finish(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.finish_and_clear();
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.finish_with_message(message.to_string());
        }
    }

    /// Spinner for an operation of unknown length, such as the build
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }

        let spinner = self.multi_progress.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        Some(spinner)
    }

    /// Print a status line on stderr (suppressed in quiet mode)
    pub fn print(&self, message: &str) {
        if !self.quiet {
            let _ = self.multi_progress.println(message);
        }
    }

    pub fn print_warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Adapt a reporter to the `(current, total, message)` callback shape
pub fn create_progress_callback(
    reporter: Arc<ProgressReporter>,
) -> impl Fn(usize, usize, &str) + Send + Sync {
    move |current, total, message| {
        reporter.update(current, total, message);
    }
}
