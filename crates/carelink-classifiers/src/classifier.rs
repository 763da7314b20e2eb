//! Intent classifier trait and strategy identifiers

use crate::engine::LexiconEngine;
use async_trait::async_trait;
use carelink_core::{IntentOutcome, Language, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Chat-completion model behind an HTTP API
    RemoteAi,
    /// Offline weighted lexicon
    LocalLexicon,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteAi => "remote_ai",
            Self::LocalLexicon => "local_lexicon",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for all intent classification strategies
///
/// Implementations classify a single turn without conversation state;
/// clarification handling sits above them.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify one user message
    async fn detect(&self, text: &str, language: Language) -> Result<IntentOutcome>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Get the strategy this classifier implements
    fn strategy(&self) -> Strategy;
}

#[async_trait]
impl IntentClassifier for LexiconEngine {
    async fn detect(&self, text: &str, language: Language) -> Result<IntentOutcome> {
        Ok(LexiconEngine::detect(self, text, language))
    }

    fn name(&self) -> &str {
        "local-lexicon"
    }

    fn strategy(&self) -> Strategy {
        Strategy::LocalLexicon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_core::Category;

    #[tokio::test]
    async fn test_lexicon_engine_as_classifier() {
        let engine = LexiconEngine::new().unwrap();
        let classifier: &dyn IntentClassifier = &engine;

        let outcome = classifier.detect("help with rent", Language::En).await.unwrap();
        assert_eq!(outcome.resource_category(), Some(Category::Housing));
        assert_eq!(classifier.strategy(), Strategy::LocalLexicon);
        assert_eq!(classifier.name(), "local-lexicon");
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::RemoteAi.to_string(), "remote_ai");
        assert_eq!(
            serde_json::to_string(&Strategy::LocalLexicon).unwrap(),
            "\"local_lexicon\""
        );
    }
}
