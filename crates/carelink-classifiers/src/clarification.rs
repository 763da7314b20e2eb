//! Resolution of pending clarifications
//!
//! When the previous turn asked "did you mean X?", the next reply is checked
//! for confirmation before any scoring happens. A confirmation promotes the
//! pending category to a resource outcome at full confidence; anything else
//! clears the slot and asks the user to be more specific.

use crate::lexicon::{normalize, LexiconSpec, WordSet};
use aho_corasick::AhoCorasick;
use carelink_core::{Category, Error, GeneralReason, IntentOutcome, Result};

/// Recognizes confirmations of a pending clarification
pub struct ConfirmationMatcher {
    affirmations: Option<WordSet>,
    phrases: Option<AhoCorasick>,
    negations: Option<WordSet>,
}

impl ConfirmationMatcher {
    /// Build from a lexicon's affirmative tokens and confirmation phrases
    pub fn from_spec(spec: &LexiconSpec) -> Result<Self> {
        let phrases: Vec<String> = spec
            .confirmation_phrases
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect();

        let phrases = if phrases.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&phrases).map_err(|e| {
                Error::classifier(format!("Failed to build confirmation matcher: {}", e))
            })?)
        };

        Ok(Self {
            affirmations: WordSet::new(&spec.affirmations)?,
            phrases,
            negations: WordSet::new(&spec.negations)?,
        })
    }

    /// Whether the normalized reply confirms the pending category.
    ///
    /// A negation vetoes the reply ("no, not sure") unless an affirmation
    /// comes first ("yes, no problem").
    pub fn is_confirmation(&self, text: &str) -> bool {
        let affirmed_at = self
            .affirmations
            .as_ref()
            .and_then(|affirmations| affirmations.first_match(text));
        let negated_at = self
            .negations
            .as_ref()
            .and_then(|negations| negations.first_match(text));

        let vetoed = match (negated_at, affirmed_at) {
            (Some(negation), Some(affirmation)) => negation < affirmation,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if vetoed {
            return false;
        }

        let mentioned = self
            .phrases
            .as_ref()
            .map_or(false, |phrases| phrases.is_match(text));

        affirmed_at.is_some() || mentioned
    }

    /// Outcome for a reply to a pending clarification of `pending`
    pub fn resolve(&self, pending: Category, text: &str) -> IntentOutcome {
        if self.is_confirmation(text) {
            IntentOutcome::confirmed(pending)
        } else {
            IntentOutcome::general(GeneralReason::ClarificationDeclined, 1.0)
        }
    }
}
