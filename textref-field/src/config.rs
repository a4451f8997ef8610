//! Field configuration and its figment-based loader.
//!
//! The same [`FieldConfig`] parameterizes parsing and formatting; it must be
//! identical on write and read for round trips to hold.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable prefix read by [`ConfigLoader`].
pub const ENV_PREFIX: &str = "TEXTREF_";

/// Output shape produced by the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    /// The structured value itself
    #[default]
    Array,
    /// Separator-delimited editable string
    String,
    /// `<ul>` of plain items and anchors
    List,
    /// Plain items and anchors joined inline
    Inline,
}

impl ReturnFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnFormat::Array => "array",
            ReturnFormat::String => "string",
            ReturnFormat::List => "list",
            ReturnFormat::Inline => "inline",
        }
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(ReturnFormat::Array),
            "string" => Ok(ReturnFormat::String),
            "list" => Ok(ReturnFormat::List),
            "inline" => Ok(ReturnFormat::Inline),
            other => Err(ConfigError::InvalidValue {
                key: "return_format".into(),
                message: format!(
                    "unknown format '{other}', expected array, string, list or inline"
                ),
            }),
        }
    }
}

/// Settings of one text reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Catalog type that references must belong to.
    #[serde(deserialize_with = "scalar_string")]
    pub post_type: String,
    /// Whether more than one entry is kept.
    pub multiple: bool,
    #[serde(deserialize_with = "scalar_string")]
    pub separator: String,
    pub return_format: ReturnFormat,
    /// CSS class on generated anchors (`list` and `inline` only).
    #[serde(deserialize_with = "scalar_string")]
    pub link_class: String,
}

/// Accept any scalar for a string setting. Environment values such as
/// `TEXTREF_POST_TYPE=123` arrive typed as numbers or booleans.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::String(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    })
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            post_type: "post".into(),
            multiple: false,
            separator: ";".into(),
            return_format: ReturnFormat::Array,
            link_class: String::new(),
        }
    }
}

impl FieldConfig {
    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = post_type.into();
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Copy of this config with the output format forced.
    pub fn with_return_format(&self, return_format: ReturnFormat) -> Self {
        Self {
            return_format,
            ..self.clone()
        }
    }

    pub fn with_link_class(mut self, link_class: impl Into<String>) -> Self {
        self.link_class = link_class.into();
        self
    }

    /// Reject settings the field cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.post_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "post_type".into(),
                message: "cannot be empty".into(),
            });
        }
        if self.multiple && self.separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "separator".into(),
                message: "cannot be empty when multiple values are allowed".into(),
            });
        }
        Ok(())
    }
}

/// Loads a [`FieldConfig`] from layered sources.
///
/// Precedence, later overriding earlier:
/// 1. Compiled defaults
/// 2. Optional configuration file (yaml, toml or json by extension)
/// 3. `TEXTREF_` environment variables
/// 4. Explicit overrides
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    read_env: bool,
    overrides: Vec<(String, serde_json::Value)>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            read_env: true,
            overrides: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip environment variables entirely.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Override a single setting, e.g. from a command line flag.
    pub fn with_override(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    /// Extract and validate the configuration.
    pub fn load(&self) -> ConfigResult<FieldConfig> {
        let figment = self.build_figment()?;
        let config: FieldConfig = figment.extract()?;
        config.validate()?;
        debug!(
            post_type = %config.post_type,
            multiple = config.multiple,
            return_format = %config.return_format,
            "loaded field configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FieldConfig::default()));

        if let Some(path) = &self.file {
            trace!("Loading config file: {}", path.display());
            figment = figment.merge(file_provider(path)?);
        }

        if self.read_env {
            figment = figment
                .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()));
        }

        for (key, value) in &self.overrides {
            figment = figment.merge(Serialized::default(key, value.clone()));
        }

        Ok(figment)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn file_provider(path: &Path) -> ConfigResult<Figment> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Ok(Figment::from(Yaml::file(path))),
        "toml" => Ok(Figment::from(Toml::file(path))),
        "json" => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            format: if extension.is_empty() {
                path.display().to_string()
            } else {
                extension
            },
        }),
    }
}
