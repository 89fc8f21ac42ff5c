//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{PrunerError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".pruner.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
    required: bool,
}

impl FileConfig {
    /// Source for `.pruner.toml` in the working directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
            required: false,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
            required: false,
        }
    }

    /// A missing file becomes an error instead of being skipped
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the commented default configuration to this path
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.path.is_file() {
            return Err(PrunerError::ConfigNotFound {
                path: self.path.clone(),
            });
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.required || self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Variable suffixes understood by [`EnvConfig`]
const ENV_KEYS: &[&str] = &[
    "PROJECT_ROOT",
    "BACKUP_DIR",
    "ENTRY_POINTS",
    "EXCLUDE",
    "PROTECT",
    "BUILD_COMMAND",
    "BUILD_TIMEOUT",
    "REACHABILITY_ONLY",
    "OUTPUT_FORMAT",
    "LOG_LEVEL",
];

/// Environment variable configuration source (`<PREFIX>_EXCLUDE`, ...)
///
/// List values are comma-separated; `BUILD_COMMAND` is split on whitespace
/// and an empty value disables the build.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.var(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid {}_{}={}", self.prefix, key, raw);
                None
            }
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        Ok(PartialSettings {
            project_root: self.var("PROJECT_ROOT").map(PathBuf::from),
            backup_dir: self.var("BACKUP_DIR").map(PathBuf::from),
            entry_points: self.var("ENTRY_POINTS").map(|v| split_list(&v)),
            exclude_patterns: self.var("EXCLUDE").map(|v| split_list(&v)),
            protected_patterns: self.var("PROTECT").map(|v| split_list(&v)),
            build_command: self
                .var("BUILD_COMMAND")
                .map(|v| v.split_whitespace().map(str::to_string).collect()),
            build_timeout_secs: self.parsed("BUILD_TIMEOUT"),
            reachability_only: self.parsed("REACHABILITY_ONLY"),
            output_format: self.parsed("OUTPUT_FORMAT"),
            log_level: self.var("LOG_LEVEL"),
            ..PartialSettings::default()
        })
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
