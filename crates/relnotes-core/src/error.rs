//! Error types for relnotes

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RelnotesError
pub type Result<T> = std::result::Result<T, RelnotesError>;

/// Main error type for relnotes operations
#[derive(Debug, Error)]
pub enum RelnotesError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Input file errors
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Reference could not be resolved
    #[error("Unknown reference: {0}")]
    UnknownRef(String),

    /// No tags found
    #[error("No tags found matching pattern: {0}")]
    NoTags(String),

    /// Tag pattern is not a valid regex
    #[error("Invalid tag pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Errors reading commit or merge-request input files
#[derive(Debug, Error)]
pub enum InputError {
    /// Input file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON for the expected records
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Date given on the command line could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "release_notes.date_format".to_string(),
            message: "cannot be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: release_notes.date_format - cannot be empty"
        );
    }

    #[test]
    fn test_from_conversions() {
        let err: RelnotesError = ConfigError::NotFound(PathBuf::from("/tmp")).into();
        assert!(matches!(err, RelnotesError::Config(_)));

        let err: RelnotesError = GitError::UnknownRef("v9".to_string()).into();
        assert!(matches!(err, RelnotesError::Git(_)));
        assert_eq!(err.to_string(), "Unknown reference: v9");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let err = GitError::InvalidPattern {
            pattern: "v(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid tag pattern 'v(': unclosed group");
    }

    #[test]
    fn test_input_error_display() {
        let err = InputError::InvalidDate("yesterday".to_string());
        assert!(err.to_string().contains("yesterday"));
    }
}
