//! Validation of the merged configuration.

use super::Config;
use crate::error::{ConfigError, Result};
use tracing::debug;

impl Config {
    /// Check every item's final value against its validator.
    ///
    /// Unknown file keys and individual validator failures go to the warn
    /// sink. Only the number of failures is returned as an error. The store
    /// is not modified, so repeated calls give the same result.
    pub fn validate(&self) -> Result<()> {
        for key in &self.unknown_keys {
            self.warn(&format!(
                "local configuration file contained setting for unknown configuration key {}",
                key
            ));
        }

        let mut failed = Vec::new();
        for item in &self.items {
            let Some(validator) = item.validator() else {
                continue;
            };
            if let Err(reason) = validator.validate(self.value(item.key())) {
                self.warn(&format!(
                    "failed to validate configuration field {} ({}): {}",
                    item.key(),
                    item.env_name(),
                    reason
                ));
                failed.push(item.key().to_string());
            }
        }

        if failed.is_empty() {
            debug!(items = self.items.len(), "Configuration validated");
            Ok(())
        } else {
            Err(ConfigError::Validation {
                count: failed.len(),
                keys: failed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigItem;
    use crate::logging::CollectingWarnSink;
    use crate::validators::{self, ValidationError};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn config_with(items: Vec<ConfigItem>, sink: &CollectingWarnSink) -> Config {
        Config::builder()
            .items(items)
            .warn_sink(sink.clone())
            .env(HashMap::new())
            .setup()
            .unwrap()
    }

    #[test]
    fn test_all_valid() {
        let sink = CollectingWarnSink::new();
        let config = config_with(
            vec![
                ConfigItem::new("server.port", "8080").with_validator(validators::uint_range(1, 65535)),
                ConfigItem::new("name", "svc").with_validator(validators::not_empty()),
                ConfigItem::new("unchecked", ""),
            ],
            &sink,
        );

        config.validate().unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_failures_are_warned_and_counted() {
        let sink = CollectingWarnSink::new();
        let config = config_with(
            vec![
                ConfigItem::new("server.port", "99999").with_validator(validators::uint_range(1, 65535)),
                ConfigItem::new("name", "").with_validator(validators::not_empty()),
                ConfigItem::new("debug", "true").with_validator(validators::is_boolean()),
            ],
            &sink,
        );

        let err = config.validate().unwrap_err();

        match err {
            ConfigError::Validation { count, ref keys } => {
                assert_eq!(count, 2);
                assert_eq!(keys, &["server.port", "name"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("server.port (CONFIG_SERVER_PORT)"));
        assert!(messages[0].contains("value 99999 is out of range [1..65535]"));
        assert!(messages[1].contains("must not be empty"));
        assert!(!err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_unknown_keys_warn_but_do_not_fail() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "stray.key: x\n").unwrap();
        let sink = CollectingWarnSink::new();
        let mut config = config_with(vec![ConfigItem::new("k", "a")], &sink);
        config.read_file(&path).unwrap();

        config.validate().unwrap();

        assert_eq!(
            sink.messages(),
            vec!["local configuration file contained setting for unknown configuration key stray.key"]
        );
    }

    #[test]
    fn test_validator_sees_overridden_value() {
        let sink = CollectingWarnSink::new();
        let mut config = config_with(
            vec![ConfigItem::new("k", "ok").with_validator(validators::not_empty())],
            &sink,
        );
        config.validate().unwrap();

        config.set("k", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let sink = CollectingWarnSink::new();
        let config = config_with(
            vec![
                ConfigItem::new("a", "x").with_validator(validators::single_character()),
                ConfigItem::new("b", "").with_validator(validators::single_character()),
                ConfigItem::new("c", "xy").with_validator(validators::single_character()),
            ],
            &sink,
        );

        let first = config.validate().unwrap_err();
        let second = config.validate().unwrap_err();

        assert!(matches!(first, ConfigError::Validation { count: 2, .. }));
        assert!(matches!(second, ConfigError::Validation { count: 2, .. }));
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_custom_closure_validator() {
        let sink = CollectingWarnSink::new();
        let config = config_with(
            vec![ConfigItem::new("mode", "fast").with_validator(|value: &str| {
                if value == "fast" || value == "safe" {
                    Ok(())
                } else {
                    Err(ValidationError::custom(format!("unsupported mode {value}")))
                }
            })],
            &sink,
        );
        config.validate().unwrap();
    }
}
