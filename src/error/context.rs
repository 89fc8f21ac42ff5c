//! Error context utilities
//!
//! Helpers for attaching context to foreign errors and for handling errors
//! according to their severity.

use crate::error::{ErrorSeverity, PrunerError, Result};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| PrunerError::Analysis {
            message: format!("{}: {}", context(), err),
        })
    }
}

/// Handle an error based on its severity
///
/// Warnings and errors are logged and swallowed; critical errors are logged
/// and handed back to the caller.
pub fn handle_error(err: PrunerError) -> Option<PrunerError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            tracing::warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            tracing::error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            tracing::error!("critical: {}", message);
            Some(err)
        }
    }
}

/// Try to run a function and handle any errors based on their severity
///
/// Returns `Ok(Some(T))` on success, `Ok(None)` when a non-critical error was
/// logged, and `Err` only for critical errors.
pub fn try_with_recovery<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(err) => match handle_error(err) {
            Some(critical) => Err(critical),
            None => Ok(None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));

        let with_context = result.with_context(|| "Failed to read manifest");

        match with_context {
            Err(PrunerError::Analysis { message }) => {
                assert!(message.contains("Failed to read manifest"));
                assert!(message.contains("file not found"));
            }
            other => panic!("Expected Analysis error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_with_recovery_swallows_non_critical() {
        let recovered: Result<Option<()>> =
            try_with_recovery(|| Err(PrunerError::parse_error("src/a.ts", "unexpected token")));
        assert!(matches!(recovered, Ok(None)));

        let critical: Result<Option<()>> =
            try_with_recovery(|| Err(PrunerError::config_error("bad config")));
        assert!(critical.is_err());
    }
}
