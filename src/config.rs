//! Engine configuration loaded from TOML.
//!
//! ```toml
//! catalog_path = "base_conocimiento.json"
//! fallback_instruction = "Call the maintenance desk."
//! question_policy = "ordered"
//! retained_snapshots = 8
//! ```

use crate::engine::{
    DiagnosisEngine, OrderedQuestionPolicy, QuestionPolicy, RandomQuestionPolicy,
    DEFAULT_FALLBACK_INSTRUCTION,
};
use crate::knowledge::DEFAULT_RETAINED_SNAPSHOTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How the engine picks among unasked questions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Random,
    Ordered,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Catalog file used at startup and on reload.
    pub catalog_path: PathBuf,
    pub fallback_instruction: String,
    pub question_policy: PolicyKind,
    /// Seed for the random policy. Unset means a fresh thread-local generator.
    pub seed: Option<u64>,
    /// Superseded catalog snapshots kept for sessions still running on them.
    pub retained_snapshots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("base_conocimiento.json"),
            fallback_instruction: DEFAULT_FALLBACK_INSTRUCTION.to_string(),
            question_policy: PolicyKind::default(),
            seed: None,
            retained_snapshots: DEFAULT_RETAINED_SNAPSHOTS,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The selection policy this configuration names.
    pub fn policy(&self) -> Box<dyn QuestionPolicy> {
        match (self.question_policy, self.seed) {
            (PolicyKind::Ordered, _) => Box::new(OrderedQuestionPolicy),
            (PolicyKind::Random, Some(seed)) => Box::new(RandomQuestionPolicy::seeded(seed)),
            (PolicyKind::Random, None) => Box::new(RandomQuestionPolicy::new()),
        }
    }

    /// Build an engine from this configuration.
    pub fn engine(&self) -> DiagnosisEngine<Box<dyn QuestionPolicy>> {
        DiagnosisEngine::new()
            .with_policy(self.policy())
            .with_fallback_instruction(self.fallback_instruction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.question_policy, PolicyKind::Random);
        assert_eq!(config.retained_snapshots, DEFAULT_RETAINED_SNAPSHOTS);
    }

    #[test]
    fn parses_all_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            catalog_path = "/srv/bk.json"
            fallback_instruction = "Llamar al taller"
            question_policy = "ordered"
            seed = 42
            retained_snapshots = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("/srv/bk.json"));
        assert_eq!(config.fallback_instruction, "Llamar al taller");
        assert_eq!(config.question_policy, PolicyKind::Ordered);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.retained_snapshots, 1);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = EngineConfig::from_toml_str(r#"question_policy = "smart""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn engine_carries_fallback() {
        let config = EngineConfig {
            fallback_instruction: "Llamar al taller".to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(config.engine().fallback_instruction(), "Llamar al taller");
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        fs::write(&path, "retained_snapshots = 2\n").unwrap();

        let config = EngineConfig::from_path(&path).unwrap();
        assert_eq!(config.retained_snapshots, 2);

        assert!(matches!(
            EngineConfig::from_path(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
