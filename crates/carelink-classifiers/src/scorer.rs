//! Category scoring against a lexicon

use crate::lexicon::{Lexicon, TermKind};
use carelink_core::Category;
use serde::Serialize;

/// Raw score of one category for one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Sum of weighted term hits, before negation dampening
    pub raw_score: f32,
    pub matched_terms: Vec<String>,
}

/// All nonzero category scores for one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreCard {
    /// Nonzero scores, in lexicon declaration order
    pub scores: Vec<CategoryScore>,
    /// A negation marker occurs in the text
    pub negated: bool,
}

impl ScoreCard {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<&CategoryScore> {
        self.scores.iter().find(|s| s.category == category)
    }
}

/// Scores normalized text against a lexicon
#[derive(Debug, Clone, Copy)]
pub struct CategoryScorer {
    phrase_multiplier: f32,
}

impl Default for CategoryScorer {
    fn default() -> Self {
        Self {
            phrase_multiplier: 2.0,
        }
    }
}

impl CategoryScorer {
    pub fn new(phrase_multiplier: f32) -> Self {
        Self { phrase_multiplier }
    }

    /// Score every category. Each distinct keyword adds the entry weight once,
    /// each distinct phrase adds `phrase_multiplier` times the weight once.
    pub fn score(&self, lexicon: &Lexicon, text: &str) -> ScoreCard {
        let scores = lexicon
            .entries()
            .iter()
            .filter_map(|entry| {
                let terms = entry.find_terms(text);
                if terms.is_empty() {
                    return None;
                }

                let raw_score = terms
                    .iter()
                    .map(|(_, kind)| match kind {
                        TermKind::Keyword => entry.weight(),
                        TermKind::Phrase => entry.weight() * self.phrase_multiplier,
                    })
                    .sum();

                Some(CategoryScore {
                    category: entry.category(),
                    raw_score,
                    matched_terms: terms.into_iter().map(|(t, _)| t.to_string()).collect(),
                })
            })
            .collect();

        ScoreCard {
            scores,
            negated: lexicon.is_negated(text),
        }
    }
}
