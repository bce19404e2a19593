//! Optional config file for the kavro tools
//!
//! ```toml
//! # ~/.kavro/config.toml
//! flush_timeout_secs = 10
//!
//! [kafka]
//! "client.id" = "kavro-demo"
//! "message.timeout.ms" = 30000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FLUSH_TIMEOUT_SECS: u64 = 30;

fn default_flush_timeout_secs() -> u64 {
    DEFAULT_FLUSH_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// How long the producer waits for outstanding deliveries on exit
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,

    /// librdkafka properties passed through to both clients
    #[serde(default)]
    pub kafka: BTreeMap<String, toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush_timeout_secs: DEFAULT_FLUSH_TIMEOUT_SECS,
            kafka: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from `explicit` if given (it must exist), otherwise from the
    /// default path if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Get config file path (~/.kavro/config.toml)
    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".kavro").join("config.toml")
    }

    /// Kafka properties as strings; numbers and booleans are stringified.
    pub fn kafka_properties(&self) -> BTreeMap<String, String> {
        self.kafka
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    pub fn flush_timeout(&self) -> Duration {
        Duration::from_secs(self.flush_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.kafka.is_empty());
        assert_eq!(config.flush_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_deserialize_kafka_table() {
        let toml_str = r#"
            flush_timeout_secs = 5

            [kafka]
            "client.id" = "kavro-demo"
            "message.timeout.ms" = 30000
            "enable.idempotence" = true
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.flush_timeout_secs, 5);

        let props = config.kafka_properties();
        assert_eq!(props["client.id"], "kavro-demo");
        assert_eq!(props["message.timeout.ms"], "30000");
        assert_eq!(props["enable.idempotence"], "true");
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "flush_timeout_secs = 12\n").unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.flush_timeout_secs, 12);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "flush_timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.kafka.insert(
            "client.id".to_string(),
            toml::Value::String("roundtrip".to_string()),
        );

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }
}
