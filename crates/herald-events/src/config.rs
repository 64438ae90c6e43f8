//! Publisher configuration.
//!
//! # Environment Variables
//!
//! - `HERALD_CALLABLE_MATCH`: `any` or `exact`, the matching mode given to
//!   callbacks subscribed with `on`
//! - `HERALD_LOG_DELIVERIES`: `true`/`1` to trace every delivery

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::callable::CallableMatch;
use crate::error::{PublisherError, Result};

/// Environment variable for the callable matching mode.
pub const CALLABLE_MATCH_ENV: &str = "HERALD_CALLABLE_MATCH";

/// Environment variable enabling per-delivery tracing.
pub const LOG_DELIVERIES_ENV: &str = "HERALD_LOG_DELIVERIES";

/// Configuration for a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PublisherConfig {
    /// Matching mode for adapters created by `on`.
    pub callable_match: CallableMatch,
    /// Emit a trace event for every single delivery.
    pub log_deliveries: bool,
}

impl PublisherConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callable matching mode.
    pub fn with_callable_match(mut self, mode: CallableMatch) -> Self {
        self.callable_match = mode;
        self
    }

    /// Enables or disables per-delivery tracing.
    pub fn with_log_deliveries(mut self, enabled: bool) -> Self {
        self.log_deliveries = enabled;
        self
    }

    /// Builds a config from defaults overridden by environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults overridden by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(CALLABLE_MATCH_ENV) {
            config.callable_match = value.parse()?;
        }

        if let Some(value) = lookup(LOG_DELIVERIES_ENV) {
            config.log_deliveries = parse_flag(LOG_DELIVERIES_ENV, &value)?;
        }

        Ok(config)
    }

    /// Parses a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(PublisherError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = PublisherConfig::default();

        assert_eq!(config.callable_match, CallableMatch::Exact);
        assert!(!config.log_deliveries);
    }

    #[test]
    fn test_config_builder() {
        let config = PublisherConfig::new()
            .with_callable_match(CallableMatch::Any)
            .with_log_deliveries(true);

        assert_eq!(config.callable_match, CallableMatch::Any);
        assert!(config.log_deliveries);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars = env(&[(CALLABLE_MATCH_ENV, "any"), (LOG_DELIVERIES_ENV, "1")]);
        let config = PublisherConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.callable_match, CallableMatch::Any);
        assert!(config.log_deliveries);
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = PublisherConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PublisherConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let vars = env(&[(LOG_DELIVERIES_ENV, "maybe")]);
        let result = PublisherConfig::from_lookup(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(PublisherError::Config(_))));

        let vars = env(&[(CALLABLE_MATCH_ENV, "fuzzy")]);
        let result = PublisherConfig::from_lookup(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(PublisherError::Config(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = PublisherConfig::from_json_str(r#"{"callable_match": "any"}"#).unwrap();

        assert_eq!(config.callable_match, CallableMatch::Any);
        assert!(!config.log_deliveries);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = PublisherConfig::from_json_str("{not json");
        assert!(matches!(result, Err(PublisherError::Json(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_deliveries": true}}"#).unwrap();

        let config = PublisherConfig::load(file.path()).unwrap();
        assert!(config.log_deliveries);
        assert_eq!(config.callable_match, CallableMatch::Exact);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PublisherConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(PublisherError::Io(_))));
    }
}
