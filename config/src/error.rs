//! Error types for loading application definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or building a definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is none of `.json`, `.yml`, `.yaml`.
    #[error("unsupported definition format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The definition parsed but describes an invalid command tree.
    #[error("invalid definition: {0}")]
    InvalidDefinition(#[from] cmdroute_core::Error),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
