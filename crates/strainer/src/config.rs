//! Engine configuration.
//!
//! The only tunables are the default pagination bounds, read from a YAML
//! document:
//!
//! ```yaml
//! defaults:
//!   limit: 50
//!   offset: 0
//! ```
//!
//! Missing keys fall back to the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Defaults, DefaultsSource};

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: Defaults,
}

impl EngineConfig {
    /// Parses a YAML configuration document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(EngineConfig::default());
        }
        let config: EngineConfig = serde_yaml::from_str(source)?;
        tracing::debug!(
            limit = config.defaults.limit,
            offset = config.defaults.offset,
            "loaded engine configuration"
        );
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        EngineConfig::from_yaml_str(&source)
    }
}

impl DefaultsSource for EngineConfig {
    fn default_limit(&self) -> usize {
        self.defaults.limit
    }

    fn default_offset(&self) -> usize {
        self.defaults.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrainerError;
    use std::io::Write;

    #[test]
    fn parses_defaults() {
        let config = EngineConfig::from_yaml_str("defaults:\n  limit: 50\n  offset: 5\n").unwrap();
        assert_eq!(config.default_limit(), 50);
        assert_eq!(config.default_offset(), 5);
    }

    #[test]
    fn missing_keys_use_builtins() {
        let config = EngineConfig::from_yaml_str("defaults:\n  limit: 7\n").unwrap();
        assert_eq!(config.defaults.offset, 0);
        assert_eq!(EngineConfig::from_yaml_str("").unwrap().defaults.limit, 20);
        assert_eq!(EngineConfig::from_yaml_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            EngineConfig::from_yaml_str("defaults:\n  limit: many\n"),
            Err(StrainerError::Config(_))
        ));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  limit: 3").unwrap();
        let config = EngineConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.defaults.limit, 3);

        assert!(matches!(
            EngineConfig::from_yaml_file("/nonexistent/strainer.yaml"),
            Err(StrainerError::Io(_))
        ));
    }
}
