//! Local lexicon engine
//!
//! Deterministic, offline classification of a single turn:
//!
//! 1. Nonsense detection (wins over everything)
//! 2. General-conversation detection
//! 3. Weighted keyword/phrase scoring with negation dampening
//! 4. Confidence bands and tie-break
//!
//! [`LexiconEngine::classify`] adds the clarification handshake on top: the
//! caller passes the session's slot in and stores the returned one.

use crate::clarification::ConfirmationMatcher;
use crate::config::{ClassifierConfig, Thresholds};
use crate::detector::{Detection, PatternDetector};
use crate::lexicon::{normalize, Lexicon, LexiconSpec};
use crate::policy::{Decision, DecisionPolicy};
use crate::scorer::CategoryScorer;
use carelink_core::{
    Category, ClarificationSlot, Error, GeneralReason, IntentOutcome, Language, Result,
};
use metrics::{counter, histogram};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Everything the engine needs for one language
pub struct LanguagePack {
    lexicon: Lexicon,
    detector: PatternDetector,
    confirmations: ConfirmationMatcher,
}

impl LanguagePack {
    /// Compile a pack; pattern sets missing from `spec` come from `fallback`
    pub fn from_spec(spec: &LexiconSpec, fallback: &LexiconSpec) -> Result<Self> {
        Ok(Self {
            lexicon: Lexicon::from_spec(spec)?,
            detector: PatternDetector::from_spec(spec, fallback)?,
            confirmations: ConfirmationMatcher::from_spec(spec)?,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn confirmations(&self) -> &ConfirmationMatcher {
        &self.confirmations
    }
}

/// Lexicon-based intent engine for all supported languages
pub struct LexiconEngine {
    english: LanguagePack,
    packs: HashMap<Language, LanguagePack>,
    scorer: CategoryScorer,
    policy: DecisionPolicy,
}

impl LexiconEngine {
    /// Engine over the embedded lexicons with default thresholds
    pub fn new() -> Result<Self> {
        Self::with_thresholds(Thresholds::default())
    }

    /// Engine over the embedded lexicons
    pub fn with_thresholds(thresholds: Thresholds) -> Result<Self> {
        let specs = Language::ALL
            .into_iter()
            .map(LexiconSpec::builtin)
            .collect::<Result<Vec<_>>>()?;
        Self::from_specs(specs, thresholds)
    }

    /// Engine over the embedded lexicons, with per-language file overrides
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;

        let specs = Language::ALL
            .into_iter()
            .map(|language| match config.lexicon_overrides.get(&language) {
                Some(path) => {
                    let spec = LexiconSpec::from_file(path)?;
                    if spec.language != language {
                        return Err(Error::config(format!(
                            "lexicon {} declares language '{}', expected '{}'",
                            path.display(),
                            spec.language,
                            language
                        )));
                    }
                    debug!(language = %language, path = %path.display(), "Loaded lexicon override");
                    Ok(spec)
                }
                None => LexiconSpec::builtin(language),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_specs(specs, config.thresholds)
    }

    /// Engine over explicit lexicons. An English lexicon is required; it
    /// serves unsupported languages and fills empty pattern sets.
    pub fn from_specs(specs: Vec<LexiconSpec>, thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;

        let english_spec = specs
            .iter()
            .find(|s| s.language == Language::En)
            .cloned()
            .ok_or_else(|| Error::config("an English lexicon is required"))?;

        let english = LanguagePack::from_spec(&english_spec, &english_spec)?;
        let mut packs = HashMap::new();
        for spec in specs.iter().filter(|s| s.language != Language::En) {
            packs.insert(spec.language, LanguagePack::from_spec(spec, &english_spec)?);
        }

        Ok(Self {
            english,
            packs,
            scorer: CategoryScorer::new(thresholds.phrase_multiplier),
            policy: DecisionPolicy::new(thresholds),
        })
    }

    /// Pack for a language, English when it has none
    pub fn pack(&self, language: Language) -> &LanguagePack {
        self.packs.get(&language).unwrap_or(&self.english)
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.policy.thresholds()
    }

    /// Score a turn without the detector, returning the ranked evidence
    pub fn explain(&self, text: &str, language: Language) -> Decision {
        let normalized = normalize(text);
        let card = self.scorer.score(self.pack(language).lexicon(), &normalized);
        self.policy.decide(&card)
    }

    /// Classify a single turn, ignoring any conversation state
    pub fn detect(&self, text: &str, language: Language) -> IntentOutcome {
        let start = Instant::now();
        let normalized = normalize(text);
        let pack = self.pack(language);

        let outcome = if normalized.is_empty() {
            IntentOutcome::general(GeneralReason::NoMatch, self.thresholds().general_confidence)
        } else {
            match pack.detector().detect(&normalized, pack.lexicon()) {
                Some(Detection::Nonsensical) => IntentOutcome::Nonsensical,
                Some(Detection::General) => IntentOutcome::general(
                    GeneralReason::Conversational,
                    self.thresholds().general_confidence,
                ),
                None => {
                    let card = self.scorer.score(pack.lexicon(), &normalized);
                    let decision = self.policy.decide(&card);
                    if let Some(best) = decision.best() {
                        debug!(
                            category = %best.category,
                            raw_score = best.raw_score,
                            confidence = best.confidence,
                            negated = best.negated,
                            terms = ?best.matched_terms,
                            "Lexicon match"
                        );
                    }
                    decision.outcome
                }
            }
        };

        let elapsed = start.elapsed();
        histogram!("carelink_classify_latency_us", "strategy" => "local_lexicon")
            .record(elapsed.as_micros() as f64);
        counter!(
            "carelink_intent_outcomes_total",
            "outcome" => outcome.label(),
            "strategy" => "local_lexicon"
        )
        .increment(1);

        debug!(
            language = %language,
            outcome = outcome.label(),
            confidence = outcome.confidence(),
            latency_us = elapsed.as_micros() as u64,
            "Classified turn"
        );

        outcome
    }

    /// Outcome for a reply to a pending clarification
    pub fn resolve_clarification(
        &self,
        pending: Category,
        text: &str,
        language: Language,
    ) -> IntentOutcome {
        let outcome = self
            .pack(language)
            .confirmations()
            .resolve(pending, &normalize(text));
        debug!(
            pending = %pending,
            confirmed = outcome.resource_category().is_some(),
            "Resolved clarification"
        );
        outcome
    }

    /// Classify a turn within a conversation.
    ///
    /// Returns the outcome and the slot to store for the next turn.
    pub fn classify(
        &self,
        text: &str,
        language: Language,
        slot: &ClarificationSlot,
    ) -> (IntentOutcome, ClarificationSlot) {
        if slot.is_conflicting() {
            warn!("Clarification slot awaiting without a category, reclassifying");
        }

        if let Some(pending) = slot.pending_category() {
            let outcome = self.resolve_clarification(pending, text, language);
            return (outcome, ClarificationSlot::empty());
        }

        let outcome = self.detect(text, language);
        let next = ClarificationSlot::after(&outcome);
        (outcome, next)
    }
}

impl std::fmt::Debug for LexiconEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<Language> = self.packs.keys().copied().collect();
        languages.push(Language::En);
        f.debug_struct("LexiconEngine")
            .field("languages", &languages)
            .field("thresholds", self.thresholds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_core::PromptKey;

    #[test]
    fn test_detect_basic_outcomes() {
        let engine = LexiconEngine::new().unwrap();

        assert_eq!(
            engine.detect("I need food", Language::En),
            IntentOutcome::Resource {
                category: Category::Food,
                confidence: 1.0,
                confirmed: false
            }
        );
        assert_eq!(
            engine.detect("unicorn training", Language::En),
            IntentOutcome::Nonsensical
        );
        assert_eq!(
            engine.detect("hello", Language::En),
            IntentOutcome::general(GeneralReason::Conversational, 1.0)
        );
        assert_eq!(
            engine.detect("what is the weather like", Language::En),
            IntentOutcome::general(GeneralReason::NoMatch, 1.0)
        );
    }

    #[test]
    fn test_empty_input_degrades_to_general() {
        let engine = LexiconEngine::new().unwrap();
        assert!(engine.detect("", Language::En).is_general());
        assert!(engine.detect("   \t ", Language::Es).is_general());
    }

    #[test]
    fn test_clarification_handshake() {
        let engine = LexiconEngine::new().unwrap();

        let (outcome, slot) =
            engine.classify("feeling a bit off", Language::En, &ClarificationSlot::empty());
        assert!(matches!(
            outcome,
            IntentOutcome::NeedsClarification {
                category: Category::MentalHealth,
                prompt_key: PromptKey::Clarify(Category::MentalHealth),
                ..
            }
        ));
        assert_eq!(slot.pending_category(), Some(Category::MentalHealth));

        let (outcome, slot) = engine.classify("yes", Language::En, &slot);
        assert_eq!(outcome, IntentOutcome::confirmed(Category::MentalHealth));
        assert_eq!(slot, ClarificationSlot::empty());
    }

    #[test]
    fn test_declined_clarification_is_not_rescored() {
        let engine = LexiconEngine::new().unwrap();
        let slot = ClarificationSlot::pending(
            Category::MentalHealth,
            PromptKey::Clarify(Category::MentalHealth),
        );

        // Would score as Food on its own
        let (outcome, slot) = engine.classify("I need food", Language::En, &slot);
        assert_eq!(
            outcome,
            IntentOutcome::general(GeneralReason::ClarificationDeclined, 1.0)
        );
        assert_eq!(slot, ClarificationSlot::empty());
    }

    #[test]
    fn test_conflicting_slot_is_reclassified() {
        let engine = LexiconEngine::new().unwrap();
        let conflicting = ClarificationSlot {
            awaiting: true,
            pending_category: None,
            last_prompt_key: None,
        };

        let (outcome, slot) = engine.classify("help with rent", Language::En, &conflicting);
        assert_eq!(outcome.resource_category(), Some(Category::Housing));
        assert_eq!(slot, ClarificationSlot::empty());
    }

    #[test]
    fn test_explain_reports_ranked_matches() {
        let engine = LexiconEngine::new().unwrap();
        let decision = engine.explain("I'm a veteran and need housing", Language::En);
        let order: Vec<Category> = decision.ranked.iter().map(|m| m.category).collect();
        assert_eq!(order, vec![Category::Veterans, Category::Housing]);
    }

    #[test]
    fn test_from_specs_requires_english() {
        let spanish = LexiconSpec::builtin(Language::Es).unwrap();
        assert!(matches!(
            LexiconEngine::from_specs(vec![spanish], Thresholds::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_config_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("so.yaml");
        std::fs::write(
            &path,
            r#"
language: so
categories:
  - category: Food
    weight: 1.0
    keywords: ["cunto"]
    phrases: ["cunto bilaash"]
"#,
        )
        .unwrap();

        let mut config = ClassifierConfig::default();
        config.lexicon_overrides.insert(Language::So, path.clone());
        let engine = LexiconEngine::from_config(&config).unwrap();

        assert_eq!(
            engine.detect("cunto bilaash", Language::So).resource_category(),
            Some(Category::Food)
        );
        // Empty pattern sets fall back to English
        assert!(engine.detect("hello", Language::So).is_general());

        let mut mismatched = ClassifierConfig::default();
        mismatched.lexicon_overrides.insert(Language::Ar, path);
        assert!(LexiconEngine::from_config(&mismatched).is_err());
    }
}
