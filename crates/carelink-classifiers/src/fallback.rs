//! Remote-first classification with local fallback
//!
//! The remote strategy gets one attempt under a timeout. On any error,
//! timeout or missing credential the local lexicon engine classifies the
//! turn, exactly once. Pending clarifications are always resolved locally.

use crate::classifier::{IntentClassifier, Strategy};
use crate::config::ClassifierConfig;
use crate::engine::LexiconEngine;
use crate::remote::OpenAiIntentClassifier;
use async_trait::async_trait;
use carelink_core::{ClarificationSlot, Error, IntentOutcome, Language, Result};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of one conversational turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub outcome: IntentOutcome,
    /// Slot to store for the session's next turn
    pub slot: ClarificationSlot,
    pub strategy: Strategy,
}

/// Chains an optional remote classifier in front of the local engine
pub struct FallbackClassifier {
    remote: Option<Arc<dyn IntentClassifier>>,
    local: Arc<LexiconEngine>,
    remote_timeout: Duration,
}

impl FallbackClassifier {
    /// Local engine only
    pub fn local_only(local: Arc<LexiconEngine>) -> Self {
        Self {
            remote: None,
            local,
            remote_timeout: Duration::ZERO,
        }
    }

    /// Remote classifier tried first, under `remote_timeout`
    pub fn new(
        remote: Arc<dyn IntentClassifier>,
        local: Arc<LexiconEngine>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            remote: Some(remote),
            local,
            remote_timeout,
        }
    }

    /// Build the local engine and, when enabled and credentialed, the
    /// OpenAI classifier
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let local = Arc::new(LexiconEngine::from_config(config)?);

        if !config.remote.enabled {
            info!("Remote classifier disabled, using local lexicon");
            return Ok(Self::local_only(local));
        }

        let remote =
            OpenAiIntentClassifier::new(config.remote.clone(), config.thresholds.bands())?;
        if !remote.is_configured() {
            warn!(
                env = %config.remote.api_key_env,
                "Remote classifier enabled but no API key set, using local lexicon"
            );
            return Ok(Self::local_only(local));
        }

        info!(
            endpoint = %config.remote.endpoint,
            model = %config.remote.model,
            "Remote classifier enabled"
        );
        Ok(Self::new(Arc::new(remote), local, config.remote.timeout()))
    }

    /// The local engine
    pub fn engine(&self) -> &LexiconEngine {
        &self.local
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Classify one turn, reporting which strategy produced the outcome
    pub async fn detect_with_source(
        &self,
        text: &str,
        language: Language,
    ) -> (IntentOutcome, Strategy) {
        if let Some(remote) = &self.remote {
            let attempt =
                tokio::time::timeout(self.remote_timeout, remote.detect(text, language)).await;
            let reason = match attempt {
                Ok(Ok(outcome)) => return (outcome, remote.strategy()),
                Ok(Err(Error::Unconfigured(msg))) => {
                    debug!(classifier = remote.name(), reason = %msg, "Remote classifier not configured");
                    "unconfigured"
                }
                Ok(Err(err)) => {
                    warn!(classifier = remote.name(), error = %err, "Falling back to local lexicon");
                    err.kind()
                }
                Err(_) => {
                    warn!(
                        classifier = remote.name(),
                        timeout_ms = self.remote_timeout.as_millis() as u64,
                        "Remote classifier timed out, falling back to local lexicon"
                    );
                    "timeout"
                }
            };
            counter!("carelink_remote_fallbacks_total", "reason" => reason).increment(1);
        }

        (self.local.detect(text, language), Strategy::LocalLexicon)
    }

    /// Classify a turn within a conversation
    pub async fn classify_turn(
        &self,
        text: &str,
        language: Language,
        slot: &ClarificationSlot,
    ) -> TurnResult {
        if let Some(pending) = slot.pending_category() {
            return TurnResult {
                outcome: self.local.resolve_clarification(pending, text, language),
                slot: ClarificationSlot::empty(),
                strategy: Strategy::LocalLexicon,
            };
        }

        if slot.is_conflicting() {
            warn!("Clarification slot awaiting without a category, reclassifying");
        }

        let (outcome, strategy) = self.detect_with_source(text, language).await;
        TurnResult {
            slot: ClarificationSlot::after(&outcome),
            outcome,
            strategy,
        }
    }
}

#[async_trait]
impl IntentClassifier for FallbackClassifier {
    async fn detect(&self, text: &str, language: Language) -> Result<IntentOutcome> {
        Ok(self.detect_with_source(text, language).await.0)
    }

    fn name(&self) -> &str {
        "fallback"
    }

    fn strategy(&self) -> Strategy {
        match &self.remote {
            Some(remote) => remote.strategy(),
            None => Strategy::LocalLexicon,
        }
    }
}
