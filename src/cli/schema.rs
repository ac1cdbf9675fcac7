//! Declarative schema files for the command line tool.
//!
//! ```yaml
//! file: local-config.yaml
//! unknown_keys: warn
//! items:
//!   - key: server.port
//!     default: "8080"
//!     description: HTTP listen port
//!     validate: { kind: uint_range, min: 1, max: 65535 }
//!   - key: log.level
//!     env: LOG_LEVEL
//!     default: info
//!     validate: { kind: pattern, pattern: "^(debug|info|warn|error)$" }
//! ```

use crate::config::{ConfigBuilder, ConfigItem, UnknownKeyPolicy};
use crate::validators;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Contents of a schema file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Configuration file to read; the command line `--file` wins over this.
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub unknown_keys: UnknownKeyPolicy,

    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

/// One configuration item.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub key: String,

    #[serde(default)]
    pub env: Option<String>,

    /// Must be a string; anything else is rejected at setup.
    #[serde(default = "empty_default")]
    pub default: Value,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub validate: Option<ValidatorSpec>,
}

fn empty_default() -> Value {
    Value::String(String::new())
}

/// Built-in validator selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorSpec {
    NotEmpty,
    Pattern { pattern: String },
    UintRange { min: u64, max: u64 },
    IntRange { min: i64, max: i64 },
    Boolean,
    Regex,
    SingleCharacter,
}

impl ItemSpec {
    pub fn to_item(&self) -> ConfigItem {
        let mut item = ConfigItem::new(self.key.clone(), self.default.clone());
        if let Some(ref env) = self.env {
            item = item.with_env_name(env.clone());
        }
        if let Some(ref description) = self.description {
            item = item.with_description(description.clone());
        }
        match self.validate {
            None => item,
            Some(ValidatorSpec::NotEmpty) => item.with_validator(validators::not_empty()),
            Some(ValidatorSpec::Pattern { ref pattern }) => {
                item.with_validator(validators::pattern(pattern))
            }
            Some(ValidatorSpec::UintRange { min, max }) => {
                item.with_validator(validators::uint_range(min, max))
            }
            Some(ValidatorSpec::IntRange { min, max }) => {
                item.with_validator(validators::int_range(min, max))
            }
            Some(ValidatorSpec::Boolean) => item.with_validator(validators::is_boolean()),
            Some(ValidatorSpec::Regex) => item.with_validator(validators::is_regex()),
            Some(ValidatorSpec::SingleCharacter) => {
                item.with_validator(validators::single_character())
            }
        }
    }
}

impl SchemaFile {
    /// Load a schema file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading schema file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid schema file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Builder preloaded with the items and loader settings of this schema.
    ///
    /// `file_override` takes precedence over the schema's own `file`.
    pub fn builder(&self, file_override: Option<&Path>) -> ConfigBuilder {
        let mut builder = crate::config::Config::builder()
            .items(self.items.iter().map(ItemSpec::to_item))
            .unknown_keys(self.unknown_keys);
        if let Some(file) = file_override.or(self.file.as_deref()) {
            builder = builder.file_name(file);
        }
        builder
    }
}
