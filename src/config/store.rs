//! Value store: current string value per key plus the tier it came from.

use serde::Serialize;
use std::collections::HashMap;

/// Layer a value was taken from (lowest to highest priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigTier {
    /// Default declared by the configuration item
    Default = 0,
    /// Local configuration file
    File = 1,
    /// Environment variable
    Environment = 2,
    /// Written directly through `Config::set`
    Override = 3,
}

impl ConfigTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigTier::Default => "default",
            ConfigTier::File => "file",
            ConfigTier::Environment => "environment",
            ConfigTier::Override => "override",
        }
    }
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: String,
    tier: ConfigTier,
}

/// Mapping from configuration key to its current value.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    entries: HashMap<String, Entry>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    pub fn tier(&self, key: &str) -> Option<ConfigTier> {
        self.entries.get(key).map(|e| e.tier)
    }

    /// Overlay `value` for `key`, replacing whatever was there.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>, tier: ConfigTier) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                tier,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
