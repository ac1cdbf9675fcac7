//! Environment variable overlay.
//!
//! Every schema item maps to one environment variable: the explicit name
//! from the item, or `CONFIG_` followed by the key with every character other
//! than `a-z` and `0-9` replaced by `_`, upper-cased.

use super::{Config, ConfigTier};
use crate::error::{ConfigError, Result};
use std::collections::{BTreeMap, HashMap};
use std::env::VarError;
use tracing::debug;

/// Prefix for derived environment variable names.
pub const ENV_PREFIX: &str = "CONFIG_";

/// Derive the environment variable name for a configuration key.
///
/// Only lowercase ASCII letters and digits survive; anything else (including
/// uppercase letters) becomes `_`.
pub fn derive_env_name(key: &str) -> String {
    let mut name = String::with_capacity(ENV_PREFIX.len() + key.len());
    name.push_str(ENV_PREFIX);
    name.extend(key.chars().map(|c| {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c.to_ascii_uppercase()
        } else {
            '_'
        }
    }));
    name
}

/// Source of environment variables.
///
/// Mirrors [`std::env::var`]: a missing variable is [`VarError::NotPresent`].
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> std::result::Result<String, VarError>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> std::result::Result<String, VarError> {
        std::env::var(name)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> std::result::Result<String, VarError> {
        self.get(name).cloned().ok_or(VarError::NotPresent)
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> std::result::Result<String, VarError> {
        self.get(name).cloned().ok_or(VarError::NotPresent)
    }
}

impl Config {
    /// Overlay environment variables onto the schema keys.
    ///
    /// A variable set to the empty string still overrides. Keys outside the
    /// schema are never touched.
    pub fn read_env(&mut self) -> Result<()> {
        let mut overrides = Vec::new();
        for item in &self.items {
            let name = item.env_name();
            match self.env.var(&name) {
                Ok(value) => overrides.push((item.key().to_string(), name, value)),
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(_)) => {
                    return Err(ConfigError::EnvNotUnicode {
                        key: item.key().to_string(),
                        name,
                    });
                }
            }
        }

        for (key, name, value) in overrides {
            debug!(key = %key, env = %name, "Configuration value taken from environment");
            self.store.set(key, value, ConfigTier::Environment);
        }
        Ok(())
    }
}
