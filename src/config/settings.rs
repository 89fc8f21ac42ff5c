//! Settings validation

use std::path::Path;

use crate::error::{PrunerError, Result};
use crate::models::config::Settings;
use crate::utils::normalize_relative;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return the first problem found
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.project_root.is_dir() {
            return Err(PrunerError::InvalidPath {
                path: settings.project_root.clone(),
            });
        }

        if settings.backup_dir.as_os_str().is_empty()
            || normalize_relative(&settings.backup_dir).is_none_or(|p| p.as_os_str().is_empty())
        {
            return Err(PrunerError::config_error(format!(
                "backup_dir must be a directory inside the project, got '{}'",
                settings.backup_dir.display()
            )));
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                PrunerError::config_error(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }
        for pattern in &settings.protected_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                PrunerError::config_error(format!("Invalid protected pattern '{}': {}", pattern, e))
            })?;
        }

        if let Some(command) = &settings.build_command {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(PrunerError::config_error(
                    "build_command must name a program; use an empty list to disable the build",
                ));
            }
        }

        if settings.build_timeout_secs == Some(0) {
            return Err(PrunerError::config_error(
                "build_timeout_secs must be at least 1",
            ));
        }

        if settings.review_size_threshold == 0 {
            return Err(PrunerError::config_error(
                "review_size_threshold must be greater than 0",
            ));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The parent directory of an output file must already exist
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(PrunerError::OutputDirectoryNotFound {
                    path: parent.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }
}
