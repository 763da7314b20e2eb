//! Nonsense and general-conversation detection
//!
//! Runs before any category scoring. Nonsense always wins over general:
//! a turn matching both is nonsensical.

use crate::lexicon::{Lexicon, LexiconSpec};
use carelink_core::{Error, Result};
use regex::Regex;

/// What the detector recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Junk, keyboard mashing or fictional entities
    Nonsensical,
    /// Greeting, thanks, farewell or a bare request for help
    General,
}

/// Compiled nonsense and general patterns for one language
#[derive(Debug, Clone)]
pub struct PatternDetector {
    nonsense: Vec<Regex>,
    general: Vec<Regex>,
}

/// Longest token that still counts as junk when repeated
const MAX_REPEATED_TOKEN_CHARS: usize = 4;

/// A single token made of one character repeated at least this often is junk
const MIN_CHAR_RUN: usize = 3;

impl PatternDetector {
    /// Build from raw patterns
    pub fn new<S: AsRef<str>>(nonsense: &[S], general: &[S]) -> Result<Self> {
        Ok(Self {
            nonsense: compile(nonsense)?,
            general: compile(general)?,
        })
    }

    /// Build from a lexicon, borrowing empty pattern sets from `fallback`
    pub fn from_spec(spec: &LexiconSpec, fallback: &LexiconSpec) -> Result<Self> {
        let nonsense = if spec.nonsense_patterns.is_empty() {
            &fallback.nonsense_patterns
        } else {
            &spec.nonsense_patterns
        };
        let general = if spec.general_patterns.is_empty() {
            &fallback.general_patterns
        } else {
            &spec.general_patterns
        };
        Self::new(nonsense, general)
    }

    /// Inspect normalized text. The lexicon vouches for repeated words it
    /// knows, so "food food" is not junk.
    pub fn detect(&self, text: &str, lexicon: &Lexicon) -> Option<Detection> {
        if self.is_nonsensical(text, lexicon) {
            Some(Detection::Nonsensical)
        } else if self.is_general(text) {
            Some(Detection::General)
        } else {
            None
        }
    }

    pub fn is_nonsensical(&self, text: &str, lexicon: &Lexicon) -> bool {
        let junk = repeated_token(text).map_or(false, |token| !self.is_known(&token, lexicon));
        junk || self.nonsense.iter().any(|re| re.is_match(text))
    }

    pub fn is_general(&self, text: &str) -> bool {
        self.general.iter().any(|re| re.is_match(text))
    }

    /// A word with meaning of its own: a category term, an affirmation
    /// or a general-conversation turn such as "help"
    fn is_known(&self, token: &str, lexicon: &Lexicon) -> bool {
        lexicon.has_term(token) || lexicon.is_affirmative(token) || self.is_general(token)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|e| {
                Error::classifier(format!("invalid pattern '{}': {}", p.as_ref(), e))
            })
        })
        .collect()
}

/// The token behind repetitive input: "aaa", "zzzz", "lol lol lol"
fn repeated_token(text: &str) -> Option<String> {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| t.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [] => None,
        [single] => {
            let mut chars = single.chars();
            let first = chars.next();
            let run = single.chars().count() >= MIN_CHAR_RUN && chars.all(|c| Some(c) == first);
            run.then(|| single.clone())
        }
        [first, rest @ ..] => {
            let repeated = first.chars().count() <= MAX_REPEATED_TOKEN_CHARS
                && rest.iter().all(|t| t == first);
            repeated.then(|| first.clone())
        }
    }
}
