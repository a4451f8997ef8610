//! Error types for the textref CLI

use thiserror::Error;
use textref_field::{CatalogError, ConfigError};

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
