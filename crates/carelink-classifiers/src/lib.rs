//! Carelink Classifiers
//!
//! Intent classification for the multilingual community resource assistant.
//!
//! Two strategies produce the same [`IntentOutcome`](carelink_core::IntentOutcome):
//! - Local lexicon: deterministic, offline weighted keyword/phrase scoring
//!   with nonsense and general-conversation detection, negation dampening
//!   and a clarification handshake for mid-confidence turns
//! - Remote AI: an OpenAI-compatible chat completion asked for a category
//!   name, with the local engine as fallback on any failure
//!
//! Lexicons for English, Spanish, Somali, Arabic and Hindi are embedded and
//! can be replaced from YAML files.

pub mod clarification;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod engine;
pub mod fallback;
pub mod lexicon;
pub mod policy;
pub mod prompts;
pub mod remote;
pub mod scorer;
pub mod session;

pub use clarification::ConfirmationMatcher;
pub use classifier::{IntentClassifier, Strategy};
pub use config::{ClassifierConfig, RemoteConfig, Thresholds};
pub use detector::{Detection, PatternDetector};
pub use engine::{LanguagePack, LexiconEngine};
pub use fallback::{FallbackClassifier, TurnResult};
pub use lexicon::{normalize, CategoryEntrySpec, Lexicon, LexiconSpec};
pub use policy::{Decision, DecisionPolicy, MatchResult};
pub use remote::OpenAiIntentClassifier;
pub use scorer::{CategoryScore, CategoryScorer, ScoreCard};
pub use session::{SessionSlot, SessionStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{IntentClassifier, Strategy};
    pub use crate::config::ClassifierConfig;
    pub use crate::engine::LexiconEngine;
    pub use crate::fallback::{FallbackClassifier, TurnResult};
    pub use crate::prompts;
    pub use crate::remote::OpenAiIntentClassifier;
    pub use crate::session::SessionStore;
}
