//! Shared application state

use anyhow::Result;
use carelink_classifiers::{FallbackClassifier, SessionStore};
use carelink_core::Language;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Remote-first classifier with local fallback
    pub classifier: Arc<FallbackClassifier>,

    /// Clarification slots of live chat sessions
    pub sessions: Arc<SessionStore>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,

    /// Language used when a request does not name one
    pub default_language: Language,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(config: &ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        let classifier_config = config.classifier()?;
        let classifier = FallbackClassifier::from_config(&classifier_config)?;

        info!(
            remote = classifier.has_remote(),
            default_language = %classifier_config.default_language,
            session_capacity = config.session_capacity,
            "Classifier initialized"
        );

        Ok(Self::from_parts(
            classifier,
            SessionStore::new(config.session_capacity),
            metrics_handle,
            classifier_config.default_language,
        ))
    }

    /// Assemble state from already built parts
    pub fn from_parts(
        classifier: FallbackClassifier,
        sessions: SessionStore,
        metrics_handle: Option<PrometheusHandle>,
        default_language: Language,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            sessions: Arc::new(sessions),
            metrics_handle,
            default_language,
        }
    }

    /// Language for a request, falling back to the default when absent
    pub fn language(&self, code: Option<&str>) -> Language {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Language::resolve(code),
            None => self.default_language,
        }
    }
}
