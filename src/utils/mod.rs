//! Utility functions and helpers

pub mod path_resolver;
pub mod protection;

pub use path_resolver::PathResolver;
pub use protection::ProtectionPolicy;

use std::path::{Component, Path, PathBuf};

/// Format a byte count as a short human-readable string ("1.5 KB")
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Render a relative path with forward slashes
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically normalize `.` and `..` components without touching the filesystem.
/// Returns `None` if `..` would climb above the start of the path.
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(part) => parts.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(100 * 1024), "100 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(
            normalize_relative(Path::new("src/components/../lib/./a.ts")),
            Some(PathBuf::from("src/lib/a.ts"))
        );
        assert_eq!(normalize_relative(Path::new("src/../../outside.ts")), None);
        assert_eq!(normalize_relative(Path::new("/abs/path")), None);
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("src/a.ts")), "src/a.ts");
    }
}
