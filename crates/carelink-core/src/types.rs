//! Core types for Carelink+

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A social-service resource category.
///
/// The serialized names match the resource store's category column exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Housing,
    Healthcare,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Substance Use")]
    SubstanceUse,
    Employment,
    Veterans,
    Crisis,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Housing,
        Category::Healthcare,
        Category::MentalHealth,
        Category::SubstanceUse,
        Category::Employment,
        Category::Veterans,
        Category::Crisis,
    ];

    /// External identifier, as stored in the resource sheet
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Housing => "Housing",
            Self::Healthcare => "Healthcare",
            Self::MentalHealth => "Mental Health",
            Self::SubstanceUse => "Substance Use",
            Self::Employment => "Employment",
            Self::Veterans => "Veterans",
            Self::Crisis => "Crisis",
        }
    }

    /// Tie-break rank among equally scored categories (higher wins).
    ///
    /// Crisis > Veterans > Mental Health > Housing > Substance Use > Food >
    /// Healthcare > Employment.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Crisis => 8,
            Self::Veterans => 7,
            Self::MentalHealth => 6,
            Self::Housing => 5,
            Self::SubstanceUse => 4,
            Self::Food => 3,
            Self::Healthcare => 2,
            Self::Employment => 1,
        }
    }

    /// Keywords used to recognize this category in free-form resource
    /// store labels ("Emergency Shelter", "Behavioral Health", ...)
    pub fn store_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Food => &["food", "nutrition", "meal", "pantry", "kitchen"],
            Self::Housing => &["housing", "shelter", "homeless"],
            Self::Healthcare => &["healthcare", "health", "medical", "clinic"],
            Self::MentalHealth => &["mental", "therapy", "counseling", "behavioral"],
            Self::SubstanceUse => &["substance", "addiction", "recovery", "drug"],
            Self::Crisis => &["crisis", "emergency", "urgent", "immediate"],
            Self::Employment => &["employment", "job", "work", "career"],
            Self::Veterans => &["veteran", "military"],
        }
    }

    /// Map a resource store category label onto a category.
    ///
    /// An exact (case-insensitive) name wins; otherwise the first category,
    /// in declaration order, that [`matches_store_label`](Self::matches_store_label).
    pub fn from_store_label(label: &str) -> Option<Category> {
        if let Ok(category) = label.parse::<Category>() {
            return Some(category);
        }

        Category::ALL
            .into_iter()
            .find(|category| category.matches_store_label(label))
    }

    /// Check whether a resource store label belongs to this category.
    ///
    /// A label can belong to several categories: "Emergency Shelter" is
    /// both Crisis and Housing.
    pub fn matches_store_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return false;
        }

        self.as_str().eq_ignore_ascii_case(&label)
            || self
                .store_keywords()
                .iter()
                .any(|keyword| label.contains(keyword))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| crate::Error::classifier(format!("unknown category '{}'", s)))
    }
}

/// A supported UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (the fallback for everything)
    #[default]
    En,
    /// Spanish
    Es,
    /// Somali
    So,
    /// Arabic
    Ar,
    /// Hindi
    Hi,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::So,
        Language::Ar,
        Language::Hi,
    ];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::So => "so",
            Self::Ar => "ar",
            Self::Hi => "hi",
        }
    }

    /// Parse a locale tag such as "es", "es-MX" or "AR".
    ///
    /// Returns `None` for unsupported languages.
    pub fn from_code(code: &str) -> Option<Language> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Language::ALL.into_iter().find(|l| l.code() == primary)
    }

    /// Resolve a locale tag, falling back to English when unsupported
    pub fn resolve(code: &str) -> Language {
        Self::from_code(code).unwrap_or_else(|| {
            tracing::debug!(code = %code, "unsupported language, using English");
            Language::En
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip_through_serde() {
        let json = serde_json::to_string(&Category::MentalHealth).unwrap();
        assert_eq!(json, "\"Mental Health\"");

        let parsed: Category = serde_json::from_str("\"Substance Use\"").unwrap();
        assert_eq!(parsed, Category::SubstanceUse);
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("mental health".parse::<Category>().unwrap(), Category::MentalHealth);
        assert_eq!(" VETERANS ".parse::<Category>().unwrap(), Category::Veterans);
        assert!("unicorns".parse::<Category>().is_err());
    }

    #[test]
    fn test_priority_order_is_total() {
        let mut priorities: Vec<u8> = Category::ALL.iter().map(|c| c.priority()).collect();
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), Category::ALL.len());
        assert!(Category::Crisis.priority() > Category::Veterans.priority());
        assert!(Category::Healthcare.priority() > Category::Employment.priority());
    }

    #[test]
    fn test_store_label_matching() {
        assert_eq!(Category::from_store_label("Food"), Some(Category::Food));
        assert_eq!(Category::from_store_label("mental health"), Some(Category::MentalHealth));
        assert_eq!(Category::from_store_label("food pantry"), Some(Category::Food));
        assert_eq!(
            Category::from_store_label("Homeless Shelter"),
            Some(Category::Housing)
        );
        assert_eq!(Category::from_store_label(""), None);
        assert_eq!(Category::from_store_label("Library"), None);

        assert!(Category::Veterans.matches_store_label("Military Family Support"));
        assert!(!Category::Veterans.matches_store_label("   "));
    }

    #[test]
    fn test_store_label_belongs_to_every_matching_category() {
        assert!(Category::Housing.matches_store_label("Emergency Shelter"));
        assert!(Category::Crisis.matches_store_label("Emergency Shelter"));

        assert!(Category::Healthcare.matches_store_label("Mental Health Clinic"));
        assert!(Category::MentalHealth.matches_store_label("Mental Health Clinic"));
        assert!(Category::Healthcare.matches_store_label("Behavioral Health"));
        assert!(Category::MentalHealth.matches_store_label("Behavioral Health"));

        assert!(!Category::Food.matches_store_label("Emergency Shelter"));
    }

    #[test]
    fn test_language_resolution() {
        assert_eq!(Language::from_code("es-MX"), Some(Language::Es));
        assert_eq!(Language::from_code("AR"), Some(Language::Ar));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::resolve("fr"), Language::En);
        assert_eq!(Language::resolve(""), Language::En);
    }
}
