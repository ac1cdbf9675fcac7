//! Layered configuration.
//!
//! Every configuration value is a string, resolved from three tiers:
//! 1. **Defaults** - declared by each [`ConfigItem`]
//! 2. **File** - a flat YAML file (`local-config.yaml` unless configured otherwise)
//! 3. **Environment** - one variable per item, explicit or `CONFIG_<KEY>`
//!
//! Later tiers win. [`Config::validate`] then checks the merged values.
//!
//! ## Example
//! ```
//! use config_env::config::{Config, ConfigItem};
//! use config_env::validators;
//! use std::collections::HashMap;
//!
//! let env: HashMap<String, String> =
//!     [("CONFIG_SERVER_PORT".to_string(), "9000".to_string())].into_iter().collect();
//! let mut config = Config::builder()
//!     .item(ConfigItem::new("server.port", "8080").with_validator(validators::uint_range(1, 65535)))
//!     .file_name("does-not-exist.yaml")
//!     .env(env)
//!     .setup()
//!     .unwrap();
//!
//! config.read().unwrap();
//! config.validate().unwrap();
//! assert_eq!(config.get("server.port"), Some("9000"));
//! ```

mod env;
mod file;
mod loader;
mod schema;
mod store;
mod validate;

pub use env::{ENV_PREFIX, EnvSource, ProcessEnv, derive_env_name};
pub use file::{DEFAULT_CONFIG_FILE_NAME, parse_flat_yaml};
pub use loader::{Config, ConfigBuilder, ResolvedEntry, UnknownKeyPolicy};
pub use schema::ConfigItem;
pub use store::{ConfigTier, ValueStore};
