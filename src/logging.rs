//! Logging initialization
//!
//! Log records go to stderr so formatted output on stdout stays clean.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::models::config::Settings;

/// Filter directive implied by the settings
///
/// `--verbose` raises the level to `debug` and `--quiet` lowers it to `error`;
/// otherwise `log_level` is used.
pub fn default_directive(settings: &Settings) -> String {
    if settings.verbose {
        "debug".to_string()
    } else if settings.quiet {
        "error".to_string()
    } else {
        settings.log_level.clone()
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn initialize(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default_directive(settings)).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(settings.use_colors)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
