//! Configuration management
//!
//! Settings are merged from a config file, `PRUNER_*` environment variables
//! and the command line, in increasing order of precedence.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig, DEFAULT_CONFIG_FILE};
pub use parser::{create_default_config, find_default_config, parse_config_content, parse_config_file};
pub use settings::SettingsValidator;

/// Prefix of the environment variables read by [`load_config`]
pub const ENV_PREFIX: &str = "PRUNER";

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Name used in log messages
    fn name(&self) -> &str;

    /// Higher numbers take precedence
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration; `partial` wins
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge a source, failing if it is available but broken
    pub fn load_from(self, source: &dyn ConfigSource) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        tracing::debug!(source = source.name(), "loading configuration");
        Ok(self.merge(source.load()?))
    }

    /// Load and merge a source, ignoring failures
    pub fn try_load_from(self, source: &dyn ConfigSource) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => self.merge(partial),
            Err(err) => {
                tracing::warn!(source = source.name(), "ignoring configuration: {}", err);
                self
            }
        }
    }

    /// Load every source in ascending priority order
    pub fn load_sources(mut self, sources: &mut [&dyn ConfigSource]) -> Result<Self> {
        sources.sort_by_key(|s| s.priority());
        for source in sources.iter() {
            self = self.load_from(*source)?;
        }
        Ok(self)
    }

    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        self.load_from(&FileConfig::with_path(path))
    }

    /// Merge the first config file found in the default locations
    pub fn try_add_default_config_file(self) -> Self {
        match parser::find_default_config() {
            Ok(Some(default_config)) => self.merge(default_config),
            Ok(None) => self,
            Err(err) => {
                tracing::warn!("ignoring default configuration file: {}", err);
                self
            }
        }
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the file, `PRUNER_*` variables and CLI arguments
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
///
/// An explicit `--config` file must load; the default locations are optional.
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let mut builder = ConfigBuilder::new();

    builder = match &cli_args.config {
        Some(path) => builder.load_from(&FileConfig::with_path(path).required())?,
        None => builder.try_add_default_config_file(),
    };

    builder = builder.try_load_from(&EnvConfig::new(env_prefix));
    builder = builder.load_from(&CliConfig::new(cli_args))?;

    builder.build()
}
