//! Server configuration

use carelink_classifiers::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of live chat sessions
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,

    /// Classifier configuration file. Takes precedence over `classifier`.
    #[serde(default)]
    pub classifier_config: Option<PathBuf>,

    /// Inline classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl ServerConfig {
    /// Load configuration from file, or use defaults when it does not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.classifier.validate()?;
        Ok(config)
    }

    /// Apply command line overrides
    pub fn apply_overrides(
        &mut self,
        listen: Option<String>,
        port: Option<u16>,
        classifier_config: Option<PathBuf>,
    ) {
        if let Some(listen) = listen {
            self.listen = listen;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if classifier_config.is_some() {
            self.classifier_config = classifier_config;
        }
    }

    /// Effective classifier configuration
    pub fn classifier(&self) -> anyhow::Result<ClassifierConfig> {
        match &self.classifier_config {
            Some(path) => Ok(ClassifierConfig::from_file(path)?),
            None => Ok(self.classifier.clone()),
        }
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            session_capacity: default_session_capacity(),
            classifier_config: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_capacity() -> usize {
    10_000
}
