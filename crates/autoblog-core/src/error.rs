//! Error types for autoblog-core

use thiserror::Error;

use crate::types::TitleError;

/// Result type for autoblog-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for autoblog-core
#[derive(Error, Debug)]
pub enum Error {
    /// Title rejected by validation
    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration from {path}: {reason}")]
    ConfigLoad { path: String, reason: String },

    /// Output directory is unusable
    #[error("Invalid output directory {path}: {reason}")]
    OutputDirectory { path: String, reason: String },

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
