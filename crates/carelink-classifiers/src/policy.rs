//! Confidence normalization and the decision policy

use crate::config::Thresholds;
use crate::scorer::ScoreCard;
use carelink_core::{Category, GeneralReason, IntentOutcome};
use serde::Serialize;
use std::cmp::Ordering;

/// A category with its normalized confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub category: Category,
    /// Weighted score before dampening
    pub raw_score: f32,
    /// Normalized confidence in [0, 1], after dampening
    pub confidence: f32,
    pub matched_terms: Vec<String>,
    /// Negation dampening was applied
    pub negated: bool,
}

/// Outcome plus the ranked evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub outcome: IntentOutcome,
    /// Every matched category, best first
    pub ranked: Vec<MatchResult>,
}

impl Decision {
    /// The winning category match, if any
    pub fn best(&self) -> Option<&MatchResult> {
        self.ranked.first()
    }
}

/// Turns a score card into an outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionPolicy {
    thresholds: Thresholds,
}

impl DecisionPolicy {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// `min(raw / divisor, 1)`, dampened when the turn is negated
    pub fn confidence(&self, category: Category, raw_score: f32, negated: bool) -> f32 {
        let base = (raw_score / self.thresholds.divisor_for(category)).min(1.0);
        let damped = if negated {
            base * self.thresholds.negation_factor
        } else {
            base
        };
        damped.clamp(0.0, 1.0)
    }

    /// Rank matches and apply the decision bands.
    ///
    /// Ties on score go to the higher-priority category.
    pub fn decide(&self, card: &ScoreCard) -> Decision {
        let mut ranked: Vec<MatchResult> = card
            .scores
            .iter()
            .map(|score| MatchResult {
                category: score.category,
                raw_score: score.raw_score,
                confidence: self.confidence(score.category, score.raw_score, card.negated),
                matched_terms: score.matched_terms.clone(),
                negated: card.negated,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.category.priority().cmp(&a.category.priority()))
        });

        let outcome = match ranked.first() {
            None => IntentOutcome::general(GeneralReason::NoMatch, self.thresholds.general_confidence),
            Some(best) => self.thresholds.bands().outcome_for(best.category, best.confidence),
        };

        Decision { outcome, ranked }
    }
}
