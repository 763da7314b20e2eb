//! Error types for Carelink+

/// Result type alias using Carelink's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Carelink operations
///
/// The local classification path never produces these for well-formed input;
/// they surface while building engines and from remote strategies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Classifier construction errors (bad lexicon, regex compile failure)
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote classifier transport or response errors
    #[error("remote classifier error: {0}")]
    Remote(String),

    /// Remote classifier has no credential configured
    #[error("remote classifier not configured: {0}")]
    Unconfigured(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new remote classifier error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a new "not configured" error
    pub fn unconfigured(msg: impl Into<String>) -> Self {
        Self::Unconfigured(msg.into())
    }

    /// Short machine-friendly label, used as a metrics dimension
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Classifier(_) => "classifier",
            Self::Config(_) => "config",
            Self::Remote(_) => "remote",
            Self::Unconfigured(_) => "unconfigured",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Timeout => "timeout",
        }
    }
}
