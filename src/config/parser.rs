//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{PrunerError, Result};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PrunerError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| PrunerError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content; `path` is only used in messages
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| PrunerError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Reject values that can never be valid, before merging
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |what: String| {
        Err(PrunerError::config_error(format!(
            "{} in config file: {}",
            what,
            path.display()
        )))
    };

    if let Some(root) = &settings.project_root {
        if root.as_os_str().is_empty() {
            return invalid("Invalid empty project_root".to_string());
        }
    }

    if let Some(backup_dir) = &settings.backup_dir {
        if backup_dir.as_os_str().is_empty() || backup_dir.is_absolute() {
            return invalid(format!(
                "backup_dir must be a relative path, got '{}'",
                backup_dir.display()
            ));
        }
    }

    let pattern_lists = [
        ("exclude_patterns", &settings.exclude_patterns),
        ("protected_patterns", &settings.protected_patterns),
    ];
    for (field, patterns) in pattern_lists {
        for pattern in patterns.iter().flatten() {
            if pattern.is_empty() {
                return invalid(format!("Empty pattern in {}", field));
            }
            if let Err(e) = glob::Pattern::new(pattern) {
                return invalid(format!("Invalid pattern '{}' in {} ({})", pattern, field, e));
            }
        }
    }

    if let Some(extensions) = &settings.include_extensions {
        if extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            return invalid("Empty extension in include_extensions".to_string());
        }
    }

    if settings.review_size_threshold == Some(0) {
        return invalid("review_size_threshold must be greater than 0".to_string());
    }

    if settings.build_timeout_secs == Some(0) {
        return invalid("build_timeout_secs must be at least 1".to_string());
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return invalid("Invalid empty output_file".to_string());
        }
    }

    Ok(())
}

/// Candidate config locations, in lookup order
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("pruner").join("config.toml"));
    }
    locations
}

/// Load the first configuration file found in the default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    for location in default_config_locations() {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "using configuration file");
            return Ok(Some(parse_config_file(location)?));
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(PrunerError::io_error)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(|e| PrunerError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("pruner.toml");

        let config_content = r#"
            backup_dir = ".old"
            entry_points = ["src/index.tsx"]
            exclude_patterns = ["**/*.stories.tsx"]
            build_command = ["pnpm", "build"]
            output_format = "json"
        "#;
        fs::write(&config_path, config_content).unwrap();

        let settings = parse_config_file(&config_path).unwrap();

        assert_eq!(settings.backup_dir, Some(PathBuf::from(".old")));
        assert_eq!(settings.entry_points, Some(vec!["src/index.tsx".to_string()]));
        assert_eq!(
            settings.build_command,
            Some(vec!["pnpm".to_string(), "build".to_string()])
        );
        assert!(settings.parallel.is_none());
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let result = parse_config_content("max_depth = 3", "virtual.toml");
        assert!(matches!(result, Err(PrunerError::ConfigParse { .. })));
    }

    #[test]
    fn test_validate_partial_settings() {
        let valid = PartialSettings {
            exclude_patterns: Some(vec!["legacy/**".to_string()]),
            review_size_threshold: Some(1024),
            ..Default::default()
        };
        assert!(validate_partial_settings(&valid, "test.toml").is_ok());

        let zero_threshold = PartialSettings {
            review_size_threshold: Some(0),
            ..Default::default()
        };
        assert!(validate_partial_settings(&zero_threshold, "test.toml").is_err());

        let bad_pattern = PartialSettings {
            protected_patterns: Some(vec!["[".to_string()]),
            ..Default::default()
        };
        assert!(validate_partial_settings(&bad_pattern, "test.toml").is_err());

        let absolute_backup = PartialSettings {
            backup_dir: Some(PathBuf::from("/tmp/backup")),
            ..Default::default()
        };
        assert!(validate_partial_settings(&absolute_backup, "test.toml").is_err());
    }

    #[test]
    fn test_create_default_config_parses() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join(".pruner.toml");

        create_default_config(&config_path).unwrap();
        assert!(config_path.exists());

        let settings = parse_config_file(&config_path).unwrap();
        assert!(settings.project_root.is_none());
        assert_eq!(settings.backup_dir, Some(PathBuf::from(".cleanup-backup")));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = parse_config_file(temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(PrunerError::ConfigNotFound { .. })));
    }
}
