//! Intent outcomes, clarification state and the external intent shape
//!
//! Every classification strategy (local lexicon or remote AI) produces an
//! [`IntentOutcome`]. The outcome translates to and from [`ExternalIntent`],
//! the JSON shape the chat widget and the remote handler exchange.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a turn ended up as general conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralReason {
    /// Greeting, thanks, farewell or a bare request for help
    Conversational,
    /// Nothing in the lexicon matched
    NoMatch,
    /// The best category scored below the clarification band
    LowConfidence,
    /// A pending clarification was answered with something other than a yes
    ClarificationDeclined,
}

/// Key into the localized prompt table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "category", rename_all = "snake_case")]
pub enum PromptKey {
    /// Overview of what the assistant can help with
    Welcome,
    /// Ask the user to be more specific
    NeedMoreInfo,
    /// Offer a human follow-up
    OfferPersonalHelp,
    /// Category-specific clarification question
    Clarify(Category),
    /// "Looking for ... resources in your area"
    SearchingResources(Category),
    /// "Great! Looking for ... resources" after a confirmed clarification
    ClarificationConfirmed(Category),
}

impl fmt::Display for PromptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("bot.welcome"),
            Self::NeedMoreInfo => f.write_str("bot.needMoreInfo"),
            Self::OfferPersonalHelp => f.write_str("bot.offerPersonalHelp"),
            Self::Clarify(c) => write!(f, "clarifications.{}", c),
            Self::SearchingResources(c) => write!(f, "bot.searchingResources.{}", c),
            Self::ClarificationConfirmed(c) => write!(f, "bot.clarificationPrefix.{}", c),
        }
    }
}

/// Confidence bands shared by every strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionBands {
    /// At or above: show resources without asking
    pub resource: f32,
    /// At or above (and below `resource`): ask a clarification question
    pub clarify: f32,
}

impl Default for DecisionBands {
    fn default() -> Self {
        Self {
            resource: 0.6,
            clarify: 0.4,
        }
    }
}

/// Band a confidence falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Resource,
    Clarify,
    General,
}

impl DecisionBands {
    /// Classify a confidence into its band
    pub fn band(&self, confidence: f32) -> Band {
        if confidence >= self.resource {
            Band::Resource
        } else if confidence >= self.clarify {
            Band::Clarify
        } else {
            Band::General
        }
    }

    /// Build the outcome for a winning category at a given confidence
    pub fn outcome_for(&self, category: Category, confidence: f32) -> IntentOutcome {
        match self.band(confidence) {
            Band::Resource => IntentOutcome::Resource {
                category,
                confidence,
                confirmed: false,
            },
            Band::Clarify => IntentOutcome::NeedsClarification {
                category,
                confidence,
                prompt_key: PromptKey::Clarify(category),
            },
            Band::General => IntentOutcome::General {
                reason: GeneralReason::LowConfidence,
                confidence,
            },
        }
    }
}

/// The result of classifying one user turn. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// Junk or fictional input; the conversation should be escalated
    Nonsensical,

    /// No resource category for this turn
    General {
        reason: GeneralReason,
        confidence: f32,
    },

    /// Show resources for this category
    Resource {
        category: Category,
        confidence: f32,
        /// True when the category came from a confirmed clarification
        confirmed: bool,
    },

    /// Ask the user to confirm the category first
    NeedsClarification {
        category: Category,
        confidence: f32,
        prompt_key: PromptKey,
    },
}

impl IntentOutcome {
    /// General outcome with the given reason and confidence
    pub fn general(reason: GeneralReason, confidence: f32) -> Self {
        Self::General { reason, confidence }
    }

    /// Resource outcome produced by a confirmed clarification
    pub fn confirmed(category: Category) -> Self {
        Self::Resource {
            category,
            confidence: 1.0,
            confirmed: true,
        }
    }

    /// Category carried by this outcome, if any
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Resource { category, .. } | Self::NeedsClarification { category, .. } => {
                Some(*category)
            }
            Self::Nonsensical | Self::General { .. } => None,
        }
    }

    /// Confidence carried by this outcome
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Nonsensical => 1.0,
            Self::General { confidence, .. }
            | Self::Resource { confidence, .. }
            | Self::NeedsClarification { confidence, .. } => *confidence,
        }
    }

    pub fn is_nonsensical(&self) -> bool {
        matches!(self, Self::Nonsensical)
    }

    pub fn is_general(&self) -> bool {
        matches!(self, Self::General { .. })
    }

    /// Whether the widget should offer a human follow-up
    pub fn should_escalate(&self) -> bool {
        self.is_nonsensical()
    }

    /// Category whose resources should be displayed now
    pub fn resource_category(&self) -> Option<Category> {
        match self {
            Self::Resource { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Prompt the assistant should answer with
    pub fn reply_key(&self) -> PromptKey {
        match self {
            Self::Nonsensical => PromptKey::OfferPersonalHelp,
            Self::General { reason, .. } => match reason {
                GeneralReason::Conversational | GeneralReason::NoMatch => PromptKey::Welcome,
                GeneralReason::LowConfidence | GeneralReason::ClarificationDeclined => {
                    PromptKey::NeedMoreInfo
                }
            },
            Self::Resource {
                category,
                confirmed: true,
                ..
            } => PromptKey::ClarificationConfirmed(*category),
            Self::Resource { category, .. } => PromptKey::SearchingResources(*category),
            Self::NeedsClarification { prompt_key, .. } => *prompt_key,
        }
    }

    /// Short label used for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nonsensical => "nonsensical",
            Self::General { .. } => "general",
            Self::Resource { .. } => "resource",
            Self::NeedsClarification { .. } => "needs_clarification",
        }
    }

    /// Translate into the external intent shape
    pub fn to_external(&self) -> ExternalIntent {
        ExternalIntent {
            category: self.category(),
            confidence: self.confidence(),
            is_nonsensical: self.is_nonsensical(),
            is_general: self.is_general(),
            should_escalate: self.should_escalate(),
        }
    }

    /// Translate an external intent back into an outcome.
    ///
    /// Category-bearing intents go through the same bands as the local
    /// engine, so a remote 0.9 and a local 0.9 land in the same place.
    pub fn from_external(intent: &ExternalIntent, bands: &DecisionBands) -> Self {
        if intent.is_nonsensical {
            return Self::Nonsensical;
        }

        let confidence = intent.confidence.clamp(0.0, 1.0);
        match intent.category {
            Some(category) if !intent.is_general => bands.outcome_for(category, confidence),
            _ => {
                let reason = if confidence >= bands.clarify {
                    GeneralReason::Conversational
                } else {
                    GeneralReason::LowConfidence
                };
                Self::general(reason, confidence)
            }
        }
    }
}

/// External intent shape, as exchanged with the chat widget and produced by
/// the remote classifier handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIntent {
    pub category: Option<Category>,
    pub confidence: f32,
    #[serde(default)]
    pub is_nonsensical: bool,
    #[serde(default)]
    pub is_general: bool,
    #[serde(default)]
    pub should_escalate: bool,
}

/// Per-session state for at most one pending clarification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationSlot {
    pub awaiting: bool,
    pub pending_category: Option<Category>,
    pub last_prompt_key: Option<PromptKey>,
}

impl ClarificationSlot {
    /// An empty slot, as at session start
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot waiting on confirmation of `category`
    pub fn pending(category: Category, prompt_key: PromptKey) -> Self {
        Self {
            awaiting: true,
            pending_category: Some(category),
            last_prompt_key: Some(prompt_key),
        }
    }

    /// The category awaiting confirmation, if the slot is consistent
    pub fn pending_category(&self) -> Option<Category> {
        if self.awaiting {
            self.pending_category
        } else {
            None
        }
    }

    /// `awaiting` is set but there is nothing to confirm
    pub fn is_conflicting(&self) -> bool {
        self.awaiting && self.pending_category.is_none()
    }

    /// Slot state after a freshly classified outcome
    pub fn after(outcome: &IntentOutcome) -> Self {
        match outcome {
            IntentOutcome::NeedsClarification {
                category,
                prompt_key,
                ..
            } => Self::pending(*category, *prompt_key),
            _ => Self::empty(),
        }
    }

    /// Clear the slot
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}
