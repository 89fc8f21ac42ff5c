//! Package dependency usage records

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A dependency declared in the package manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    /// Version range as declared
    pub version: String,
    pub is_dev: bool,
    pub is_used: bool,
    /// Code files whose text references the package
    pub usage_locations: Vec<PathBuf>,
}

impl DependencyRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>, is_dev: bool) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            is_dev,
            is_used: false,
            usage_locations: Vec::new(),
        }
    }
}
