//! Configuration item descriptors.

use crate::validators::Validate;
use serde_yaml::Value;
use std::fmt;
use std::sync::Arc;

/// A declared configuration key.
///
/// Items are built by the caller and handed to [`Config::setup`](super::Config::setup)
/// in the order they should be processed. The default is kept as a YAML value
/// so that non-string defaults can be rejected at setup rather than silently
/// stringified.
#[derive(Clone)]
pub struct ConfigItem {
    key: String,
    env_name: Option<String>,
    default: Value,
    description: Option<String>,
    validator: Option<Arc<dyn Validate>>,
}

impl ConfigItem {
    pub fn new(key: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            env_name: None,
            default: default.into(),
            description: None,
            validator: None,
        }
    }

    /// Use an explicit environment variable instead of the derived name.
    pub fn with_env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The explicitly configured environment variable name, if any.
    pub fn explicit_env_name(&self) -> Option<&str> {
        self.env_name.as_deref().filter(|name| !name.is_empty())
    }

    /// The environment variable consulted for this item.
    pub fn env_name(&self) -> String {
        match self.explicit_env_name() {
            Some(name) => name.to_string(),
            None => super::env::derive_env_name(&self.key),
        }
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The default as text, or `None` when it is not a YAML string.
    pub fn default_str(&self) -> Option<&str> {
        self.default.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn validator(&self) -> Option<&dyn Validate> {
        self.validator.as_deref()
    }
}

impl fmt::Debug for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigItem")
            .field("key", &self.key)
            .field("env_name", &self.env_name)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .finish()
    }
}
