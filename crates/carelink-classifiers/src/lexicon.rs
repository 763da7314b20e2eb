//! Per-language lexicons
//!
//! A lexicon is plain data: weighted keyword and phrase lists per category,
//! negation markers, affirmative tokens, confirmation phrases and the
//! nonsense/general patterns the detector uses. The five supported languages
//! ship embedded; any of them can be replaced from a YAML file without
//! touching code.

use aho_corasick::AhoCorasick;
use carelink_core::{Category, Error, Language, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const EN_LEXICON: &str = include_str!("../lexicons/en.yaml");
const ES_LEXICON: &str = include_str!("../lexicons/es.yaml");
const SO_LEXICON: &str = include_str!("../lexicons/so.yaml");
const AR_LEXICON: &str = include_str!("../lexicons/ar.yaml");
const HI_LEXICON: &str = include_str!("../lexicons/hi.yaml");

/// Lowercase, unify apostrophes and collapse whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}', '`'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lexicon file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconSpec {
    pub language: Language,

    /// Restrict every term to matches at the start of a word. Off by
    /// default: terms match anywhere, so "unemployment" hits "employment".
    #[serde(default)]
    pub word_start: bool,

    /// Short stems that only match at the start of a word, even when
    /// `word_start` is off ("rent" must not fire on "different")
    #[serde(default)]
    pub word_start_terms: Vec<String>,

    #[serde(default)]
    pub negations: Vec<String>,

    #[serde(default)]
    pub affirmations: Vec<String>,

    /// Resource mentions that also confirm a pending clarification
    #[serde(default)]
    pub confirmation_phrases: Vec<String>,

    /// Regexes for junk or fictional input. Empty means the English set.
    #[serde(default)]
    pub nonsense_patterns: Vec<String>,

    /// Regexes for greetings, thanks, farewells and bare help requests.
    /// Empty means the English set.
    #[serde(default)]
    pub general_patterns: Vec<String>,

    /// Category entries, in declaration order
    pub categories: Vec<CategoryEntrySpec>,
}

/// One category's entry in a lexicon file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntrySpec {
    pub category: Category,
    pub weight: f32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl LexiconSpec {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// The embedded lexicon for a language
    pub fn builtin(language: Language) -> Result<Self> {
        let yaml = match language {
            Language::En => EN_LEXICON,
            Language::Es => ES_LEXICON,
            Language::So => SO_LEXICON,
            Language::Ar => AR_LEXICON,
            Language::Hi => HI_LEXICON,
        };
        Self::from_yaml(yaml)
    }

    /// Check weights and category uniqueness
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.categories {
            if !(entry.weight > 0.0) {
                return Err(Error::classifier(format!(
                    "{} lexicon: weight for {} must be positive, got {}",
                    self.language, entry.category, entry.weight
                )));
            }
            if !seen.insert(entry.category) {
                return Err(Error::classifier(format!(
                    "{} lexicon: duplicate entry for {}",
                    self.language, entry.category
                )));
            }
        }
        Ok(())
    }
}

/// Whether a term came from the keyword or the phrase list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Keyword,
    Phrase,
}

/// Compiled entry for one category
pub struct LexiconEntry {
    category: Category,
    weight: f32,
    terms: Vec<(String, TermKind)>,
    /// Per term: only counts at the start of a word
    anchored: Vec<bool>,
    matcher: AhoCorasick,
}

impl LexiconEntry {
    fn new(
        spec: &CategoryEntrySpec,
        word_start: bool,
        anchored_terms: &HashSet<String>,
    ) -> Result<Self> {
        let terms: Vec<(String, TermKind)> = spec
            .keywords
            .iter()
            .map(|k| (normalize(k), TermKind::Keyword))
            .chain(spec.phrases.iter().map(|p| (normalize(p), TermKind::Phrase)))
            .filter(|(term, _)| !term.is_empty())
            .collect();

        let anchored = terms
            .iter()
            .map(|(term, _)| word_start || anchored_terms.contains(term))
            .collect();

        let matcher = AhoCorasick::builder()
            .build(terms.iter().map(|(term, _)| term.as_str()))
            .map_err(|e| {
                Error::classifier(format!(
                    "Failed to build matcher for {}: {}",
                    spec.category, e
                ))
            })?;

        Ok(Self {
            category: spec.category,
            weight: spec.weight,
            terms,
            anchored,
            matcher,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Terms present in `text`, each at most once, in declaration order.
    ///
    /// `text` must already be normalized.
    pub fn find_terms(&self, text: &str) -> Vec<(&str, TermKind)> {
        let mut hit = vec![false; self.terms.len()];
        for m in self.matcher.find_overlapping_iter(text) {
            let index = m.pattern().as_usize();
            if !self.anchored[index] || starts_word(text, m.start()) {
                hit[index] = true;
            }
        }

        self.terms
            .iter()
            .zip(hit)
            .filter(|(_, hit)| *hit)
            .map(|((term, kind), _)| (term.as_str(), *kind))
            .collect()
    }
}

fn starts_word(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Whole-word matcher over a list of words or short phrases
#[derive(Debug, Clone)]
pub struct WordSet {
    regex: Regex,
}

impl WordSet {
    /// Build a matcher; `None` when the list is empty
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Option<Self>> {
        let mut words: Vec<String> = words
            .iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Ok(None);
        }

        // Longest first so multi-word markers win over their prefixes
        words.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        let regex = Regex::new(&format!(r"\b(?:{})\b", alternation))
            .map_err(|e| Error::classifier(format!("Failed to build word matcher: {}", e)))?;

        Ok(Some(Self { regex }))
    }

    /// Whether any word occurs in the normalized text
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte offset of the leftmost word in the normalized text
    pub fn first_match(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.start())
    }
}

/// Compiled scoring tables for one language
pub struct Lexicon {
    language: Language,
    entries: Vec<LexiconEntry>,
    negations: Option<WordSet>,
    affirmations: Option<WordSet>,
}

impl Lexicon {
    /// Compile a lexicon from its spec
    pub fn from_spec(spec: &LexiconSpec) -> Result<Self> {
        spec.validate()?;

        let anchored: HashSet<String> = spec
            .word_start_terms
            .iter()
            .map(|term| normalize(term))
            .collect();
        let entries = spec
            .categories
            .iter()
            .map(|entry| LexiconEntry::new(entry, spec.word_start, &anchored))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            language: spec.language,
            entries,
            negations: WordSet::new(&spec.negations)?,
            affirmations: WordSet::new(&spec.affirmations)?,
        })
    }

    /// Compile the embedded lexicon for a language
    pub fn builtin(language: Language) -> Result<Self> {
        Self::from_spec(&LexiconSpec::builtin(language)?)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Whether the normalized text contains a negation marker as a word
    pub fn is_negated(&self, text: &str) -> bool {
        self.negations
            .as_ref()
            .map_or(false, |negations| negations.is_match(text))
    }

    /// Whether the normalized text contains any category term
    pub fn has_term(&self, text: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| !entry.find_terms(text).is_empty())
    }

    /// Whether the normalized text contains an affirmation as a word
    pub fn is_affirmative(&self, text: &str) -> bool {
        self.affirmations
            .as_ref()
            .map_or(false, |affirmations| affirmations.is_match(text))
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("language", &self.language)
            .field("entries", &self.entries.len())
            .finish()
    }
}
