//! Carelink Core
//!
//! Core types shared across the Carelink+ resource finder components.
//!
//! This crate provides:
//! - The fixed set of resource categories and supported UI languages
//! - Intent outcomes and the external intent shape every strategy maps to
//! - Per-session clarification state
//! - Error types and result handling

pub mod error;
pub mod intent;
pub mod types;

pub use error::{Error, Result};
pub use intent::{
    Band, ClarificationSlot, DecisionBands, ExternalIntent, GeneralReason, IntentOutcome,
    PromptKey,
};
pub use types::{Category, Language};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::intent::{ClarificationSlot, ExternalIntent, IntentOutcome, PromptKey};
    pub use crate::types::{Category, Language};
}
