//! Import specifier resolution
//!
//! Only relative specifiers (`./x`, `../x`) resolve to project files. Bare
//! package names and aliases are left to the dependency heuristics.

use crate::utils::normalize_relative;
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions tried, in order, when a specifier omits one
pub const RESOLVE_EXTENSIONS: [&str; 5] = [".ts", ".tsx", ".js", ".jsx", ".json"];

const RESOLUTION_CACHE_SIZE: usize = 4096;

type ResolutionKey = (PathBuf, String);

/// Path resolver with caching
pub struct PathResolver {
    project_root: PathBuf,
    file_exists_cache: Arc<DashMap<PathBuf, bool>>,
    resolution_cache: Arc<Mutex<LruCache<ResolutionKey, Option<PathBuf>>>>,
}

impl PathResolver {
    /// Create a resolver for files under `project_root`
    pub fn new(project_root: &Path) -> Self {
        let capacity = NonZeroUsize::new(RESOLUTION_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);

        Self {
            project_root: project_root.to_path_buf(),
            file_exists_cache: Arc::new(DashMap::new()),
            resolution_cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve `specifier` as written in `from_file` (project-relative) to a
    /// project-relative file path.
    ///
    /// Tries the literal path, then each of [`RESOLVE_EXTENSIONS`] appended,
    /// then `index.<ext>` inside the path. Non-relative specifiers and paths
    /// escaping the project root yield `None`.
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        if !specifier.starts_with('.') {
            return None;
        }

        let from_dir = from_file.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let key = (from_dir, specifier.to_string());

        if let Some(cached) = self.resolution_cache.lock().get(&key) {
            return cached.clone();
        }

        let resolved = self.resolve_relative(specifier, &key.0);
        self.resolution_cache.lock().put(key, resolved.clone());
        resolved
    }

    fn resolve_relative(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let base = normalize_relative(&from_dir.join(specifier))?;
        // An empty path means the project root itself; only index files apply.
        let base_str = base.to_string_lossy().to_string();

        if !base_str.is_empty() && self.is_file(&base) {
            return Some(base);
        }

        if !base_str.is_empty() {
            for ext in RESOLVE_EXTENSIONS {
                let candidate = PathBuf::from(format!("{}{}", base_str, ext));
                if self.is_file(&candidate) {
                    return Some(candidate);
                }
            }
        }

        for ext in RESOLVE_EXTENSIONS {
            let candidate = base.join(format!("index{}", ext));
            if self.is_file(&candidate) {
                return Some(candidate);
            }
        }

        None
    }

    /// Cached check that a project-relative path is a regular file
    fn is_file(&self, relative: &Path) -> bool {
        if let Some(hit) = self.file_exists_cache.get(relative) {
            return *hit;
        }
        let exists = self.project_root.join(relative).is_file();
        self.file_exists_cache.insert(relative.to_path_buf(), exists);
        exists
    }

    /// Drop all cached lookups, e.g. after files were removed
    pub fn clear_cache(&self) {
        self.file_exists_cache.clear();
        self.resolution_cache.lock().clear();
    }
}
