//! Structured error types for the configuration pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by setup, the file and environment loaders, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    // Setup errors
    #[error("configuration item #{index} has an empty key")]
    EmptyKey { index: usize },

    #[error("configuration key {key} is declared more than once")]
    DuplicateKey { key: String },

    #[error("error parsing default value for key {key} - this library only supports strings")]
    NonStringDefault { key: String },

    // File errors
    #[error("error reading local configuration yaml file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "error parsing local configuration flat yaml file {} (both keys and values must be strings): {source}",
        path.display()
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(
        "error parsing local configuration flat yaml file {} (both keys and values must be strings): {key} is {found}",
        path.display()
    )]
    NotFlat {
        path: PathBuf,
        key: String,
        found: &'static str,
    },

    #[error(
        "local configuration file {} contained setting for unknown configuration key {key}, bailing out",
        path.display()
    )]
    UnknownKey { path: PathBuf, key: String },

    // Environment errors
    #[error("environment variable {name} for configuration key {key} is not valid unicode")]
    EnvNotUnicode { key: String, name: String },

    // Validation errors
    #[error(
        "some configuration values failed to validate or parse. There were {count} error(s). See details above"
    )]
    Validation { count: usize, keys: Vec<String> },
}

impl ConfigError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn not_flat(path: &Path, key: impl Into<String>, found: &'static str) -> Self {
        Self::NotFlat {
            path: path.to_path_buf(),
            key: key.into(),
            found,
        }
    }

    pub(crate) fn unknown_key(path: &Path, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            path: path.to_path_buf(),
            key: key.into(),
        }
    }

    /// Whether this error came out of the validation phase rather than loading.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Validation { .. })
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
