//! Layered string configuration library.
//!
//! Defaults, a flat YAML file and environment variables are merged in that
//! order, then checked by per-key validators.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod validators;

pub use config::{Config, ConfigItem, ConfigTier, UnknownKeyPolicy};
pub use error::{ConfigError, Result};
