//! Configuration for the intent classifiers

use carelink_core::{Category, DecisionBands, Error, Language, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the local engine and the optional remote strategy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Scoring constants and decision bands
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Language used when a request does not carry one
    #[serde(default)]
    pub default_language: Language,

    /// Lexicon files replacing the built-in lexicon of a language
    #[serde(default)]
    pub lexicon_overrides: HashMap<Language, PathBuf>,

    /// Remote AI strategy
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Confidence at or above which resources are shown directly
    pub resource: f32,

    /// Confidence at or above which a clarification is asked
    pub clarify: f32,

    /// Confidence reported for conversational and no-match turns
    pub general_confidence: f32,

    /// Multiplier applied to every score when a negation marker is present
    pub negation_factor: f32,

    /// Phrase hits score this many times the entry weight
    pub phrase_multiplier: f32,

    /// Normalization divisor for ordinary categories
    pub default_divisor: f32,

    /// Normalization divisor for Crisis
    pub crisis_divisor: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            resource: 0.6,
            clarify: 0.4,
            general_confidence: 1.0,
            negation_factor: 0.3,
            phrase_multiplier: 2.0,
            default_divisor: 2.5,
            crisis_divisor: 2.0,
        }
    }
}

impl Thresholds {
    /// Decision bands derived from these thresholds
    pub fn bands(&self) -> DecisionBands {
        DecisionBands {
            resource: self.resource,
            clarify: self.clarify,
        }
    }

    /// Normalization divisor for a category
    pub fn divisor_for(&self, category: Category) -> f32 {
        match category {
            Category::Crisis => self.crisis_divisor,
            _ => self.default_divisor,
        }
    }

    /// Validate the thresholds
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::config(format!("{} must be within [0, 1], got {}", name, value)))
            }
        };

        unit("resource", self.resource)?;
        unit("clarify", self.clarify)?;
        unit("general_confidence", self.general_confidence)?;
        unit("negation_factor", self.negation_factor)?;

        if self.clarify > self.resource {
            return Err(Error::config(format!(
                "clarify threshold ({}) must not exceed resource threshold ({})",
                self.clarify, self.resource
            )));
        }

        for (name, value) in [
            ("phrase_multiplier", self.phrase_multiplier),
            ("default_divisor", self.default_divisor),
            ("crisis_divisor", self.crisis_divisor),
        ] {
            if !(value > 0.0) {
                return Err(Error::config(format!("{} must be positive, got {}", name, value)));
            }
        }

        Ok(())
    }
}

/// Remote (chat completion) strategy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Try the remote strategy before the local engine
    pub enabled: bool,

    /// Chat completions endpoint
    pub endpoint: String,

    /// Model name sent with each request
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    pub temperature: f32,

    pub max_tokens: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 3_000,
            temperature: 0.1,
            max_tokens: 20,
        }
    }
}

impl RemoteConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate the remote settings (only checked when enabled)
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() {
            return Err(Error::config("remote.endpoint must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::config("remote.model must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("remote.timeout_ms must be positive"));
        }
        Ok(())
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.remote.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.thresholds.resource, 0.6);
        assert_eq!(config.thresholds.clarify, 0.4);
        assert_eq!(config.thresholds.divisor_for(Category::Crisis), 2.0);
        assert_eq!(config.thresholds.divisor_for(Category::Food), 2.5);
        assert_eq!(config.default_language, Language::En);
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.api_key_env, "OPENAI_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
default_language: es
thresholds:
  negation_factor: 0.5
lexicon_overrides:
  so: /etc/carelink/so.yaml
remote:
  enabled: true
  timeout_ms: 1500
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.default_language, Language::Es);
        assert_eq!(config.thresholds.negation_factor, 0.5);
        assert_eq!(config.thresholds.phrase_multiplier, 2.0);
        assert_eq!(
            config.lexicon_overrides.get(&Language::So),
            Some(&PathBuf::from("/etc/carelink/so.yaml"))
        );
        assert!(config.remote.enabled);
        assert_eq!(config.remote.timeout(), Duration::from_millis(1500));
        assert_eq!(config.remote.max_tokens, 20);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let inverted = "thresholds:\n  resource: 0.3\n  clarify: 0.5\n";
        assert!(matches!(
            ClassifierConfig::from_yaml(inverted),
            Err(Error::Config(_))
        ));

        let zero_divisor = "thresholds:\n  default_divisor: 0.0\n";
        assert!(ClassifierConfig::from_yaml(zero_divisor).is_err());

        let out_of_range = "thresholds:\n  negation_factor: 1.5\n";
        assert!(ClassifierConfig::from_yaml(out_of_range).is_err());
    }

    #[test]
    fn test_enabled_remote_needs_endpoint() {
        let yaml = "remote:\n  enabled: true\n  endpoint: ''\n";
        assert!(ClassifierConfig::from_yaml(yaml).is_err());

        let disabled = "remote:\n  enabled: false\n  endpoint: ''\n";
        assert!(ClassifierConfig::from_yaml(disabled).is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.yaml");
        std::fs::write(&path, "default_language: hi\n").unwrap();

        let config = ClassifierConfig::from_file(&path).unwrap();
        assert_eq!(config.default_language, Language::Hi);

        assert!(matches!(
            ClassifierConfig::from_file(dir.path().join("missing.yaml")),
            Err(Error::Io(_))
        ));
    }
}
