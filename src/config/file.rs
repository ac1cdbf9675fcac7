//! Flat YAML file overlay.
//!
//! The file is a single-level mapping whose keys and values are all strings.
//! It is parsed completely before anything is merged, so a bad file never
//! leaves the store half-updated.

use super::{Config, ConfigItem, ConfigTier, UnknownKeyPolicy};
use crate::error::{ConfigError, Result};
use serde_yaml::Value;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::debug;

/// File read by [`Config::read`] unless the builder names another one.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "local-config.yaml";

/// Parse flat YAML content into ordered key/value pairs.
///
/// `path` is only used for error reporting.
pub fn parse_flat_yaml(content: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(Vec::new());
    }

    let root: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::parse(path, e))?;
    let mapping = match root {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => return Err(ConfigError::not_flat(path, "<root>", describe(&other))),
    };

    let mut pairs = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            other => {
                let shown = serde_yaml::to_string(&other).unwrap_or_default();
                return Err(ConfigError::not_flat(
                    path,
                    shown.trim_end().to_string(),
                    "a non-string key",
                ));
            }
        };
        match value {
            Value::String(value) => pairs.push((key, value)),
            other => return Err(ConfigError::not_flat(path, key, describe(&other))),
        }
    }
    Ok(pairs)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl Config {
    /// Overlay values from a flat YAML file.
    ///
    /// A missing file is not an error. Keys outside the schema are merged and
    /// remembered for the warning emitted by [`Config::validate`], unless the
    /// unknown-key policy is [`UnknownKeyPolicy::Reject`].
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No local configuration file, keeping current values");
                return Ok(());
            }
            Err(e) => return Err(ConfigError::read(path, e)),
        };
        let pairs = parse_flat_yaml(&content, path)?;

        let known: HashSet<&str> = self.items.iter().map(ConfigItem::key).collect();
        if self.unknown_key_policy == UnknownKeyPolicy::Reject {
            if let Some((key, _)) = pairs.iter().find(|(key, _)| !known.contains(key.as_str())) {
                return Err(ConfigError::unknown_key(path, key.clone()));
            }
        }

        let mut recorded: HashSet<String> = self.unknown_keys.iter().cloned().collect();
        let count = pairs.len();
        for (key, value) in pairs {
            if !known.contains(key.as_str()) && recorded.insert(key.clone()) {
                self.unknown_keys.push(key.clone());
            }
            self.store.set(key, value, ConfigTier::File);
        }

        debug!(path = %path.display(), count, "Merged local configuration file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> Config {
        Config::builder()
            .item(ConfigItem::new("k", "a"))
            .item(ConfigItem::new("server.port", "8080"))
            .env(HashMap::new())
            .setup()
            .unwrap()
    }

    #[test]
    fn test_parse_flat_yaml_keeps_file_order() {
        let pairs = parse_flat_yaml("b: \"2\"\na: one\n", Path::new("x.yaml")).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "one".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_empty_and_comment_only() {
        assert!(parse_flat_yaml("", Path::new("x.yaml")).unwrap().is_empty());
        assert!(parse_flat_yaml("  \n", Path::new("x.yaml")).unwrap().is_empty());
        assert!(
            parse_flat_yaml("# nothing here\n", Path::new("x.yaml"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_parse_rejects_nested_and_non_string_values() {
        let err = parse_flat_yaml("db:\n  host: x\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFlat { ref key, found, .. } if key == "db" && found == "a mapping"));

        let err = parse_flat_yaml("port: 8080\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFlat { found: "a number", .. }));

        let err = parse_flat_yaml("list: [a, b]\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFlat { found: "a sequence", .. }));

        let err = parse_flat_yaml("empty:\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFlat { found: "null", .. }));
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        let err = parse_flat_yaml("- a\n- b\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFlat { ref key, .. } if key == "<root>"));
    }

    #[test]
    fn test_parse_rejects_duplicate_non_string_and_tagged_keys() {
        let err = parse_flat_yaml("a: x\na: y\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = parse_flat_yaml("1: a\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotFlat { ref key, found: "a non-string key", .. } if key == "1"
        ));

        let err = parse_flat_yaml("a: !foo x\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotFlat { ref key, found: "a tagged value", .. } if key == "a"
        ));
    }

    #[test]
    fn test_parse_syntax_error() {
        let err = parse_flat_yaml("k: [unclosed\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("x.yaml"));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let mut config = config();

        config.read_file(temp.path().join("absent.yaml")).unwrap();

        assert_eq!(config.get("k"), Some("a"));
        assert_eq!(config.tier("k"), Some(ConfigTier::Default));
    }

    #[test]
    fn test_file_overrides_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "k: b\n").unwrap();
        let mut config = config();

        config.read_file(&path).unwrap();

        assert_eq!(config.get("k"), Some("b"));
        assert_eq!(config.tier("k"), Some(ConfigTier::File));
        assert_eq!(config.get("server.port"), Some("8080"));
    }

    #[test]
    fn test_unknown_key_is_merged_and_recorded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "extra: x\nk: b\nextra2: y\n").unwrap();
        let mut config = config();

        config.read_file(&path).unwrap();

        assert_eq!(config.get("extra"), Some("x"));
        assert_eq!(config.get("extra2"), Some("y"));
        assert_eq!(config.unknown_keys(), &["extra", "extra2"]);
    }

    #[test]
    fn test_reading_twice_does_not_duplicate_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "extra: x\n").unwrap();
        let mut config = config();

        config.read_file(&path).unwrap();
        config.read_file(&path).unwrap();

        assert_eq!(config.unknown_keys(), &["extra"]);
    }

    #[test]
    fn test_reject_policy_fails_without_merging() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "k: b\nextra: x\n").unwrap();
        let mut config = Config::builder()
            .item(ConfigItem::new("k", "a"))
            .unknown_keys(UnknownKeyPolicy::Reject)
            .env(HashMap::new())
            .setup()
            .unwrap();

        let err = config.read_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::UnknownKey { ref key, .. } if key == "extra"));
        assert!(err.to_string().contains("bailing out"));
        assert_eq!(config.get("k"), Some("a"));
        assert_eq!(config.get("extra"), None);
    }

    #[test]
    fn test_bad_file_leaves_store_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local-config.yaml");
        fs::write(&path, "k: b\nnested:\n  a: b\n").unwrap();
        let mut config = config();

        assert!(config.read_file(&path).is_err());
        assert_eq!(config.get("k"), Some("a"));
    }

    #[test]
    fn test_directory_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let mut config = config();

        let err = config.read_file(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unreachable_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let mut config = config();

        // lookup fails with something other than NotFound
        let err = config
            .read_file(blocker.join("local-config.yaml"))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(config.get("k"), Some("a"));
    }
}
