//! Error types for the text reference field

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised by a [`Catalog`](crate::Catalog) implementation.
///
/// Parsing and formatting never surface these: they are logged and the
/// affected piece degrades to free text.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not answer
    #[error("catalog unavailable: {message}")]
    Unavailable { message: String },

    /// Two catalog entities share an id
    #[error("duplicate catalog id: {id}")]
    DuplicateId { id: u64 },

    /// IO error while loading a catalog
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error while loading a catalog
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CatalogError {
    /// Shorthand for [`CatalogError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Errors raised while loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file named explicitly does not exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: std::path::PathBuf },

    /// Figment could not extract the configuration
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Configuration file extension is not yaml, toml or json
    #[error("Unsupported configuration file format: {format}")]
    UnsupportedFormat { format: String },

    /// A setting holds a value the field cannot work with
    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}
