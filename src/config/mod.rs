//! Three-tier configuration resolver
//!
//! Resolution order, first hit wins: runtime override (CLI `-D`), value
//! persisted in `{base}/baton.properties`, built-in default. The store
//! is loaded exactly once per run; the only mutation afterwards is the
//! lazy allocation of the subprocess redirect file path, which is safe
//! because execution is strictly single-threaded.

pub mod properties;
pub mod property;

pub use property::Property;

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;

use crate::error::{BatonError, Result};

/// Name of the persisted project configuration file.
pub const PROPERTIES_FILE: &str = "baton.properties";

/// Configuration context owned once per run.
#[derive(Debug, Default)]
pub struct Config {
    /// Runtime overrides, highest-priority tier.
    overrides: BTreeMap<String, String>,
    /// Persisted values loaded once from the project's properties file.
    store: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration for the project rooted at `base`.
    /// A missing properties file yields a defaults-only configuration.
    pub fn load(base: &Path, overrides: BTreeMap<String, String>) -> Result<Self> {
        let store = properties::load(&base.join(PROPERTIES_FILE))?;
        Ok(Self { overrides, store })
    }

    /// Resolve a well-known property through all three tiers.
    pub fn get(&self, property: Property) -> String {
        self.get_key(property.key(), &property.default_value())
    }

    /// Resolve an arbitrary key, using the supplied default as last tier.
    pub fn get_key(&self, key: &str, default: &str) -> String {
        self.lookup(key).map_or_else(|| default.to_string(), String::from)
    }

    /// Resolve an arbitrary key without a default. Used for open-ended
    /// namespaces such as `module.<name>` source mappings.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| self.store.get(key))
            .map(String::as_str)
    }

    /// Resolve a property and split it into trimmed values by the given
    /// separator pattern. A blank resolved value yields no values.
    pub fn get_split(&self, property: Property, separator: &str) -> Result<Vec<String>> {
        let value = self.get(property);
        if value.trim().is_empty() {
            return Ok(Vec::new());
        }
        let pattern = Regex::new(separator).map_err(|e| BatonError::InvalidPattern {
            pattern: separator.to_string(),
            reason: e.to_string(),
        })?;
        Ok(pattern
            .split(&value)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect())
    }

    /// Whether the boolean-valued key is enabled; unset means enabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get_key(key, "true").eq_ignore_ascii_case("true")
    }

    /// Whether offline mode is active.
    pub fn offline(&self) -> bool {
        self.get(Property::Offline).eq_ignore_ascii_case("true")
    }

    /// Persist a value for the remainder of this run. Confined to the
    /// lazy allocation of the redirect file path.
    pub fn set(&mut self, key: &str, value: String) {
        self.store.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with(file: &str, overrides: &[(&str, &str)]) -> Config {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROPERTIES_FILE), file).unwrap();
        let overrides = overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::load(temp.path(), overrides).unwrap()
    }

    #[test]
    fn test_override_wins_over_persisted_and_default() {
        let config = config_with(
            "baton.project.version=7.7.7\n",
            &[("baton.project.version", "9.9.9")],
        );
        assert_eq!(config.get(Property::ProjectVersion), "9.9.9");
    }

    #[test]
    fn test_persisted_wins_over_default() {
        let config = config_with("baton.project.version=7.7.7\n", &[]);
        assert_eq!(config.get(Property::ProjectVersion), "7.7.7");
    }

    #[test]
    fn test_default_when_nothing_set() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path(), BTreeMap::new()).unwrap();
        assert_eq!(config.get(Property::ProjectVersion), "1.0.0-SNAPSHOT");
        assert_eq!(config.get(Property::RedirectType), "PIPE");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(temp.path(), BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_lookup_has_no_default_tier() {
        let config = config_with("module.junit3=file:///tmp/junit-3.7.jar\n", &[]);
        assert_eq!(config.lookup("module.junit3"), Some("file:///tmp/junit-3.7.jar"));
        assert_eq!(config.lookup("module.unmapped"), None);
    }

    #[test]
    fn test_get_split_trims_values() {
        let config = config_with(
            "baton.project.launch.options=--enable-preview ,  -Xmx1g\n",
            &[],
        );
        let values = config
            .get_split(Property::LaunchOptions, "[,\\s]+")
            .unwrap();
        assert_eq!(values, vec!["--enable-preview", "-Xmx1g"]);
    }

    #[test]
    fn test_get_split_blank_value_yields_empty_sequence() {
        let config = config_with("baton.project.launch.options=   \n", &[]);
        let values = config
            .get_split(Property::LaunchOptions, "[,\\s]+")
            .unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_get_split_rejects_bad_pattern() {
        let config = config_with("baton.project.launch.options=a,b\n", &[]);
        let result = config.get_split(Property::LaunchOptions, "[unclosed");
        assert!(matches!(result, Err(BatonError::InvalidPattern { .. })));
    }

    #[test]
    fn test_gate_default_enabled() {
        let config = config_with("", &[]);
        assert!(config.is_enabled("baton.action.build.enabled"));
    }

    #[test]
    fn test_gate_disabled_by_any_other_value() {
        let config = config_with("baton.action.build.enabled=no\n", &[]);
        assert!(!config.is_enabled("baton.action.build.enabled"));
        let config = config_with("baton.action.build.enabled=false\n", &[]);
        assert!(!config.is_enabled("baton.action.build.enabled"));
    }

    #[test]
    fn test_set_is_visible_to_later_reads() {
        let mut config = config_with("", &[]);
        config.set("baton.run.redirect.file", "/tmp/baton-run-1.txt".to_string());
        assert_eq!(
            config.get(Property::RedirectFile),
            "/tmp/baton-run-1.txt"
        );
    }
}
