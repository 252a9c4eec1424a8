//! Compiler configuration
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! { "boolean_coercion": "strict", "join_strategy": "on_demand", "log_compiles": false }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::BooleanCoercion;

/// How join handles come into existence during a compile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Authorized join paths are created on first use
    #[default]
    OnDemand,
    /// Only joins registered by the join hook may be used
    Preregistered,
}

/// Compiler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Boolean parsing mode (default: strict)
    pub boolean_coercion: BooleanCoercion,

    /// Join creation mode (default: on_demand)
    pub join_strategy: JoinStrategy,

    /// Emit compile lifecycle events (default: false)
    pub log_compiles: bool,
}

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompilerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_boolean_coercion(mut self, mode: BooleanCoercion) -> Self {
        self.boolean_coercion = mode;
        self
    }

    pub fn with_join_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.join_strategy = strategy;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_compiles = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.boolean_coercion, BooleanCoercion::Strict);
        assert_eq!(config.join_strategy, JoinStrategy::OnDemand);
        assert!(!config.log_compiles);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CompilerConfig::from_json(r#"{"boolean_coercion": "lenient"}"#).unwrap();
        assert_eq!(config.boolean_coercion, BooleanCoercion::Lenient);
        assert_eq!(config.join_strategy, JoinStrategy::OnDemand);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = CompilerConfig::from_json(r#"{"max_depth": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"join_strategy": "preregistered", "log_compiles": true}}"#).unwrap();

        let config = CompilerConfig::load(file.path()).unwrap();
        assert_eq!(config.join_strategy, JoinStrategy::Preregistered);
        assert!(config.log_compiles);
    }

    #[test]
    fn test_missing_file() {
        let err = CompilerConfig::load(Path::new("/nonexistent/searchkit.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
