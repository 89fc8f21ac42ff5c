//! Package manifest reading
//!
//! Only the dependency tables of `package.json` matter here; everything else in
//! the manifest is ignored.

use crate::error::{PrunerError, Result, ResultExt};
use crate::models::dependency::DependencyRecord;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Declared dependencies of a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// One record per package name, sorted by name.
    ///
    /// A name present in both tables is reported once, as a dev dependency.
    pub fn dependency_records(&self) -> Vec<DependencyRecord> {
        let mut merged: BTreeMap<&str, DependencyRecord> = BTreeMap::new();

        for (name, version) in &self.dependencies {
            merged.insert(name.as_str(), DependencyRecord::new(name, version, false));
        }
        for (name, version) in &self.dev_dependencies {
            merged.insert(name.as_str(), DependencyRecord::new(name, version, true));
        }

        merged.into_values().collect()
    }
}

/// Reader for package.json files
pub struct ManifestReader;

impl ManifestReader {
    /// Parse manifest content
    pub fn parse(content: &str) -> Result<Manifest> {
        let json_value: Value = serde_json::from_str(content)
            .map_err(|e| PrunerError::json_parse_error("package.json", e))?;

        let obj = match json_value {
            Value::Object(obj) => obj,
            _ => {
                return Err(PrunerError::InvalidManifest {
                    path: "package.json".into(),
                    message: "Root value is not an object".into(),
                });
            }
        };

        Ok(Manifest {
            dependencies: Self::extract_table(&obj, "dependencies")?,
            dev_dependencies: Self::extract_table(&obj, "devDependencies")?,
        })
    }

    /// Read a manifest from disk. A missing file yields `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Manifest>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content)
            .map(Some)
            .map_err(|e| match e {
                PrunerError::JsonParse { source, .. } => PrunerError::JsonParse {
                    file: path.to_path_buf(),
                    source,
                },
                PrunerError::InvalidManifest { message, .. } => PrunerError::InvalidManifest {
                    path: path.to_path_buf(),
                    message,
                },
                other => other,
            })
    }

    fn extract_table(obj: &Map<String, Value>, key: &str) -> Result<BTreeMap<String, String>> {
        match obj.get(key) {
            None | Some(Value::Null) => Ok(BTreeMap::new()),
            Some(Value::Object(table)) => Ok(table
                .iter()
                .map(|(name, version)| {
                    let version = match version {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (name.clone(), version)
                })
                .collect()),
            Some(_) => Err(PrunerError::InvalidManifest {
                path: "package.json".into(),
                message: format!("`{}` is not an object", key),
            }),
        }
    }
}
