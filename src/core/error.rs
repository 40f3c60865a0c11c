//! Error handling for the clientgen generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use clientgen::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("missing template"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for clientgen generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for clientgen generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error without a more specific location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to the file or directory it happened on
    #[error("I/O error at {}: {source}", path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Schema document cannot be turned into resources and links
    #[error("Schema error: {0}")]
    Schema(String),

    /// A path or template referenced a context key that does not exist
    #[error("Unresolved placeholder '{key}' in {path}")]
    UnresolvedPlaceholder { key: String, path: String },

    /// Malformed placeholder syntax or a value that cannot be placed in a path
    #[error("Placeholder error: {0}")]
    Placeholder(String),

    /// Template parsing or rendering failed for a specific file
    #[error("Template error in {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new placeholder error
    pub fn placeholder<S: Into<String>>(msg: S) -> Self {
        Self::Placeholder(msg.into())
    }

    /// Attach a path to an I/O error
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("Invalid configuration");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_error_schema_creation() {
        let error = Error::schema("definitions must be an object");
        assert!(matches!(error, Error::Schema(_)));
        assert_eq!(
            error.to_string(),
            "Schema error: definitions must be an object"
        );
    }

    #[test]
    fn test_unresolved_placeholder_display() {
        let error = Error::UnresolvedPlaceholder {
            key: "package_name".to_string(),
            path: "{package_name}/client.py".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unresolved placeholder 'package_name' in {package_name}/client.py"
        );
    }

    #[test]
    fn test_error_from_str() {
        let error: Error = "Test error message".into();
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: Test error message");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
        assert!(error.to_string().contains("File not found"));
    }

    #[test]
    fn test_io_at_names_the_path() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = Error::io_at("/tmp/out/client.py", io_error);
        assert!(error.to_string().contains("/tmp/out/client.py"));
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json");
        let error: Error = json_result.unwrap_err().into();
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().contains("JSON parsing error"));
    }
}
