//! Error types for project settings resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("package.json not found in {0}")]
    ManifestNotFound(PathBuf),

    #[error("invalid package.json: {0}")]
    InvalidManifest(#[from] serde_json::Error),

    #[error("invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
