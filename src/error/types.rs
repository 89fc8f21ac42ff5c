//! Error types and definitions for pruner
//!
//! Setup-level failures (bad project root, unreadable directories, backup root
//! creation, build spawn, configuration) surface as `PrunerError`. Per-file
//! problems during analysis or removal are carried as data instead.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for pruner operations
#[derive(Debug, Error)]
pub enum PrunerError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSerialize {
        #[source]
        source: toml::ser::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Regular expression errors
    #[error("Regex error: {source}")]
    Regex {
        #[source]
        source: regex::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Project analysis errors
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Source file could not be parsed
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid package.json structure
    #[error("Invalid package.json structure in {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// The backup root could not be created or read
    #[error("Backup directory error for {path}: {source}")]
    BackupDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build command could not be started
    #[error("Failed to start build command `{command}`: {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Interrupted operation
    #[error("Operation interrupted")]
    Interrupted,

    /// A removal or rollback finished with refused or failed files
    #[error("{operation} did not complete: {message}")]
    Incomplete { operation: String, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl PrunerError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            PrunerError::PermissionDenied { .. } => ErrorSeverity::Warning,
            PrunerError::JsonParse { .. } => ErrorSeverity::Warning,
            PrunerError::InvalidManifest { .. } => ErrorSeverity::Warning,
            PrunerError::Parse { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            PrunerError::Config { .. } => ErrorSeverity::Critical,
            PrunerError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            PrunerError::ConfigRead { .. } => ErrorSeverity::Critical,
            PrunerError::ConfigParse { .. } => ErrorSeverity::Critical,
            PrunerError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            PrunerError::StdoutWrite { .. } => ErrorSeverity::Critical,
            PrunerError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,
            PrunerError::InvalidPath { .. } => ErrorSeverity::Critical,
            PrunerError::BackupDirectory { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PrunerError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            PrunerError::JsonParse { file, source } => {
                format!("Invalid JSON in '{}': {}. Please check the file format.", file.display(), source)
            }
            PrunerError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            PrunerError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a valid project directory.", path.display())
            }
            PrunerError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create one with `pruner init` or use command line options.", path.display())
            }
            PrunerError::InvalidManifest { path, message } => {
                format!("Invalid package.json in '{}': {}. Dependency analysis skipped.", path.display(), message)
            }
            PrunerError::BackupDirectory { path, source } => {
                format!("Cannot use backup directory '{}': {}. Nothing was removed.", path.display(), source)
            }
            PrunerError::BuildSpawn { command, source } => {
                format!("Could not run build command `{}`: {}. Use --no-build to skip build validation.", command, source)
            }
            PrunerError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        PrunerError::Io { source }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PrunerError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        PrunerError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        PrunerError::PermissionDenied { path: path.into() }
    }

    /// Create an analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        PrunerError::Analysis {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PrunerError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parse error for a source file
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PrunerError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an error for a removal or rollback that left work undone
    pub fn incomplete(operation: impl Into<String>, message: impl Into<String>) -> Self {
        PrunerError::Incomplete {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PrunerError {
    fn from(err: std::io::Error) -> Self {
        PrunerError::io_error(err)
    }
}

impl From<toml::de::Error> for PrunerError {
    fn from(err: toml::de::Error) -> Self {
        PrunerError::TomlParse { source: err }
    }
}

impl From<toml::ser::Error> for PrunerError {
    fn from(err: toml::ser::Error) -> Self {
        PrunerError::TomlSerialize { source: err }
    }
}

impl From<csv::Error> for PrunerError {
    fn from(err: csv::Error) -> Self {
        PrunerError::Csv { source: err }
    }
}

impl From<glob::PatternError> for PrunerError {
    fn from(err: glob::PatternError) -> Self {
        PrunerError::GlobPattern { source: err }
    }
}

impl From<regex::Error> for PrunerError {
    fn from(err: regex::Error) -> Self {
        PrunerError::Regex { source: err }
    }
}

impl From<serde_json::Error> for PrunerError {
    fn from(err: serde_json::Error) -> Self {
        PrunerError::JsonSerialize { source: err }
    }
}

/// Result type alias for pruner operations
pub type Result<T> = std::result::Result<T, PrunerError>;
