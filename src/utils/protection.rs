//! Files that must never be removed

use crate::error::Result;
use regex::RegexSet;
use std::path::{Path, PathBuf};

/// Built-in protected paths, matched against `/`-separated relative paths
const BUILTIN_PROTECTED: &[&str] = &[
    r"^package\.json$",
    r"^package-lock\.json$",
    r"^bun\.lockb$",
    r"^yarn\.lock$",
    r"^tsconfig.*\.json$",
    r"^vite\.config\.",
    r"^tailwind\.config\.",
    r"^postcss\.config\.",
    r"^eslint\.config\.",
    r"^\.gitignore$",
    r"(?i)^readme",
    r"^index\.html$",
    r"^src/main\.",
    r"^src/App\.",
    r"^src/index\.",
    r"^public/",
    r"^\.env",
    r"^\.git/",
    r"^node_modules/",
    r"^dist/",
    r"^build/",
];

/// Protected-file policy: built-in rules, entry points, and user globs
#[derive(Debug, Clone)]
pub struct ProtectionPolicy {
    builtin: RegexSet,
    entry_points: Vec<PathBuf>,
    user_patterns: Vec<glob::Pattern>,
    backup_dir: Option<PathBuf>,
}

impl ProtectionPolicy {
    pub fn new(entry_points: &[String], user_patterns: &[String]) -> Result<Self> {
        let builtin = RegexSet::new(BUILTIN_PROTECTED)?;
        let user_patterns = user_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            builtin,
            entry_points: entry_points.iter().map(PathBuf::from).collect(),
            user_patterns,
            backup_dir: None,
        })
    }

    /// Also protect everything under the backup directory
    pub fn with_backup_dir(mut self, backup_dir: &Path) -> Self {
        self.backup_dir = crate::utils::normalize_relative(backup_dir)
            .filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Whether `path` (relative to the project root) is protected
    pub fn is_protected(&self, path: &Path) -> bool {
        let slashed = crate::utils::to_slash(path);

        self.builtin.is_match(&slashed)
            || self.entry_points.iter().any(|e| e == path)
            || self.user_patterns.iter().any(|p| p.matches(&slashed))
            || self.backup_dir.as_ref().is_some_and(|dir| {
                crate::utils::normalize_relative(path).is_some_and(|p| p.starts_with(dir))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::default_entry_points;

    fn policy() -> ProtectionPolicy {
        ProtectionPolicy::new(&default_entry_points(), &["src/legacy/**".to_string()]).unwrap()
    }

    #[test]
    fn test_builtin_rules() {
        let policy = policy();
        for path in [
            "package.json",
            "tsconfig.app.json",
            "vite.config.ts",
            "README.md",
            "readme.txt",
            ".env.local",
            "public/favicon.ico",
            "src/main.tsx",
            "src/App.css",
            "index.html",
        ] {
            assert!(policy.is_protected(Path::new(path)), "{} should be protected", path);
        }
    }

    #[test]
    fn test_ordinary_files_unprotected() {
        let policy = policy();
        for path in ["src/utils.ts", "src/components/Button.tsx", "docs/package.json"] {
            assert!(!policy.is_protected(Path::new(path)), "{} should not be protected", path);
        }
    }

    #[test]
    fn test_user_patterns_and_entry_points() {
        let policy = ProtectionPolicy::new(
            &["app/start.ts".to_string()],
            &["src/legacy/**".to_string()],
        )
        .unwrap();

        assert!(policy.is_protected(Path::new("src/legacy/old.ts")));
        assert!(policy.is_protected(Path::new("app/start.ts")));
        assert!(!policy.is_protected(Path::new("app/other.ts")));
    }

    #[test]
    fn test_invalid_user_pattern() {
        assert!(ProtectionPolicy::new(&[], &["[broken".to_string()]).is_err());
    }

    #[test]
    fn test_backup_dir_is_protected() {
        let policy = ProtectionPolicy::new(&[], &[])
            .unwrap()
            .with_backup_dir(Path::new("./bk"));

        assert!(policy.is_protected(Path::new("bk/src/b.ts")));
        assert!(policy.is_protected(Path::new("./bk/src/b.ts")));
        assert!(!policy.is_protected(Path::new("bkp/src/b.ts")));
        assert!(!policy.is_protected(Path::new("src/bk.ts")));
    }
}
