//! Configuration context: schema, current values, and loader settings.

use super::env::{EnvSource, ProcessEnv};
use super::file::DEFAULT_CONFIG_FILE_NAME;
use super::schema::ConfigItem;
use super::store::{ConfigTier, ValueStore};
use crate::error::{ConfigError, Result};
use crate::logging::{TracingWarnSink, WarnSink};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// What to do with file keys that no configuration item declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeyPolicy {
    /// Merge the value and warn about the key during validation (default).
    #[default]
    Warn,
    /// Fail the file read without merging anything.
    Reject,
}

/// One resolved configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub tier: ConfigTier,
    /// Environment variable consulted for this key; `None` for unknown keys.
    #[serde(rename = "env")]
    pub env_name: Option<String>,
    pub known: bool,
}

/// A configuration context.
///
/// Holds the schema and the merged values. Build one with [`Config::setup`]
/// or [`Config::builder`], then call [`Config::read`] and [`Config::validate`].
/// Reads only need `&self`, so a finished `Config` can be shared across threads.
pub struct Config {
    pub(super) items: Vec<ConfigItem>,
    pub(super) store: ValueStore,
    pub(super) unknown_keys: Vec<String>,
    pub(super) warn_sink: Arc<dyn WarnSink>,
    pub(super) env: Arc<dyn EnvSource>,
    pub(super) unknown_key_policy: UnknownKeyPolicy,
    pub(super) file_name: PathBuf,
}

impl Config {
    /// Set up a configuration with default loader settings.
    pub fn setup(items: impl IntoIterator<Item = ConfigItem>) -> Result<Self> {
        Self::builder().items(items).setup()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Read the configured file, then the environment.
    pub fn read(&mut self) -> Result<()> {
        let file_name = self.file_name.clone();
        self.read_file(file_name)?;
        self.read_env()
    }

    /// Current value of `key`, or `None` if nothing ever set it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.get(key)
    }

    /// Current value of `key`, or the empty string if nothing ever set it.
    pub fn value(&self, key: &str) -> &str {
        self.store.get(key).unwrap_or_default()
    }

    /// Tier the current value of `key` came from.
    pub fn tier(&self, key: &str) -> Option<ConfigTier> {
        self.store.tier(key)
    }

    /// Overwrite (or create) the value of `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store.set(key, value, ConfigTier::Override);
    }

    /// Configuration items in declaration order.
    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&ConfigItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Keys found in the configuration file that no item declares, in file order.
    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown_keys
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn unknown_key_policy(&self) -> UnknownKeyPolicy {
        self.unknown_key_policy
    }

    /// All resolved values: declared keys in schema order, then unknown keys.
    pub fn entries(&self) -> Vec<ResolvedEntry<'_>> {
        let declared = self.items.iter().filter_map(|item| {
            let key = item.key();
            Some(ResolvedEntry {
                key,
                value: self.store.get(key)?,
                tier: self.store.tier(key)?,
                env_name: Some(item.env_name()),
                known: true,
            })
        });
        let unknown = self.unknown_keys.iter().filter_map(|key| {
            Some(ResolvedEntry {
                key: key.as_str(),
                value: self.store.get(key)?,
                tier: self.store.tier(key)?,
                env_name: None,
                known: false,
            })
        });
        declared.chain(unknown).collect()
    }

    pub(super) fn warn(&self, message: &str) {
        self.warn_sink.warn(message);
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("items", &self.items)
            .field("store", &self.store)
            .field("unknown_keys", &self.unknown_keys)
            .field("unknown_key_policy", &self.unknown_key_policy)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    items: Vec<ConfigItem>,
    warn_sink: Arc<dyn WarnSink>,
    env: Arc<dyn EnvSource>,
    unknown_key_policy: UnknownKeyPolicy,
    file_name: PathBuf,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            warn_sink: Arc::new(TracingWarnSink::new()),
            env: Arc::new(ProcessEnv),
            unknown_key_policy: UnknownKeyPolicy::default(),
            file_name: PathBuf::from(DEFAULT_CONFIG_FILE_NAME),
        }
    }
}

impl ConfigBuilder {
    pub fn item(mut self, item: ConfigItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = ConfigItem>) -> Self {
        self.items.extend(items);
        self
    }

    /// Where validation warnings go (default: `tracing`).
    pub fn warn_sink(mut self, sink: impl WarnSink + 'static) -> Self {
        self.warn_sink = Arc::new(sink);
        self
    }

    /// Where environment variables are looked up (default: the process environment).
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_key_policy = policy;
        self
    }

    /// File read by [`Config::read`] (default: `local-config.yaml`).
    pub fn file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_name = path.into();
        self
    }

    /// Check every item, then initialize the store with the defaults.
    ///
    /// Nothing is created if any item is invalid.
    pub fn setup(self) -> Result<Config> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            if item.key().is_empty() {
                return Err(ConfigError::EmptyKey { index });
            }
            if !seen.insert(item.key()) {
                return Err(ConfigError::DuplicateKey {
                    key: item.key().to_string(),
                });
            }
            if item.default_str().is_none() {
                return Err(ConfigError::NonStringDefault {
                    key: item.key().to_string(),
                });
            }
        }

        let mut store = ValueStore::with_capacity(self.items.len());
        for item in &self.items {
            store.set(item.key(), item.default_str().unwrap_or_default(), ConfigTier::Default);
        }
        debug!(items = self.items.len(), "Configuration initialized with defaults");

        Ok(Config {
            items: self.items,
            store,
            unknown_keys: Vec::new(),
            warn_sink: self.warn_sink,
            env: self.env,
            unknown_key_policy: self.unknown_key_policy,
            file_name: self.file_name,
        })
    }
}
