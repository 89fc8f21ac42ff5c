//! Error handling for pruner
//!
//! Error types, the crate result alias, and helpers for attaching context.

pub mod context;
pub mod types;

pub use context::{handle_error, try_with_recovery, ResultExt};
pub use types::{ErrorSeverity, PrunerError, Result};
