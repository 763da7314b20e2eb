//! End-to-end behavior of the local lexicon engine
//!
//! Conversation scenarios in every supported language plus the engine's
//! general properties (determinism, boundedness, monotonicity, negation).

use carelink_classifiers::{LexiconEngine, LexiconSpec};
use carelink_core::{Category, ClarificationSlot, GeneralReason, IntentOutcome, Language};
use proptest::prelude::*;
use std::sync::OnceLock;

fn engine() -> &'static LexiconEngine {
    static ENGINE: OnceLock<LexiconEngine> = OnceLock::new();
    ENGINE.get_or_init(|| LexiconEngine::new().expect("built-in lexicons compile"))
}

fn classify(engine: &LexiconEngine, text: &str, language: &str) -> IntentOutcome {
    engine
        .classify(text, Language::resolve(language), &ClarificationSlot::empty())
        .0
}

fn confidence_for(engine: &LexiconEngine, text: &str, category: Category) -> f32 {
    engine
        .explain(text, Language::En)
        .ranked
        .iter()
        .find(|m| m.category == category)
        .map(|m| m.confidence)
        .unwrap_or(0.0)
}

#[test]
fn test_need_food_is_resource() {
    let outcome = classify(engine(), "I need food", "en");
    assert_eq!(outcome.resource_category(), Some(Category::Food));
    assert!(outcome.confidence() >= 0.6);
}

#[test]
fn test_help_with_rent_is_housing() {
    let outcome = classify(engine(), "help with rent", "en");
    assert_eq!(outcome.resource_category(), Some(Category::Housing));
    assert!(outcome.confidence() >= 0.6);
}

#[test]
fn test_hello_is_general() {
    assert_eq!(
        classify(engine(), "hello", "en"),
        IntentOutcome::general(GeneralReason::Conversational, 1.0)
    );
}

#[test]
fn test_unicorn_training_is_nonsensical() {
    let outcome = classify(engine(), "unicorn training", "en");
    assert_eq!(outcome, IntentOutcome::Nonsensical);
    assert!(outcome.to_external().should_escalate);
}

#[test]
fn test_negated_food_is_dampened() {
    let engine = engine();
    let plain = confidence_for(engine, "I need food", Category::Food);
    let negated = confidence_for(engine, "I don't need food", Category::Food);

    assert!(negated <= 0.3 * plain + 1e-6);
    assert!(classify(engine, "I don't need food", "en").resource_category().is_none());
}

#[test]
fn test_clarification_flow() {
    let engine = engine();

    let (outcome, slot) =
        engine.classify("feeling a bit off", Language::En, &ClarificationSlot::empty());
    assert!(matches!(
        outcome,
        IntentOutcome::NeedsClarification {
            category: Category::MentalHealth,
            ..
        }
    ));
    assert!(slot.awaiting);

    let (outcome, slot) = engine.classify("yes", Language::En, &slot);
    assert_eq!(
        outcome,
        IntentOutcome::Resource {
            category: Category::MentalHealth,
            confidence: 1.0,
            confirmed: true
        }
    );
    assert_eq!(slot, ClarificationSlot::empty());
}

#[test]
fn test_unrelated_reply_clears_clarification() {
    let engine = engine();
    let (_, slot) = engine.classify("feeling a bit off", Language::En, &ClarificationSlot::empty());

    let (outcome, slot) = engine.classify("what time is it", Language::En, &slot);
    assert!(outcome.is_general());
    assert_eq!(slot, ClarificationSlot::empty());
}

#[test]
fn test_crisis_uses_lower_divisor() {
    // A single Crisis keyword (1.2) clears the clarification band: 1.2 / 2.0
    let outcome = classify(engine(), "this is urgent", "en");
    assert_eq!(outcome.resource_category(), Some(Category::Crisis));
    assert!((outcome.confidence() - 0.6).abs() < 1e-6);
}

#[test]
fn test_repeated_category_word_is_scored() {
    let outcome = classify(engine(), "food food food", "en");
    assert!(!outcome.is_nonsensical());
    assert_eq!(outcome.category(), Some(Category::Food));
}

#[test]
fn test_repeated_known_words_are_not_nonsense() {
    for text in ["help help", "yes yes", "ok ok"] {
        let outcome = classify(engine(), text, "en");
        assert!(outcome.is_general(), "{text}: {outcome:?}");
    }
    assert!(classify(engine(), "lol lol lol", "en").is_nonsensical());
}

#[test]
fn test_terms_match_inside_longer_words() {
    let engine = engine();

    // "employment" inside "unemployment": 1.0 / 2.5
    match classify(engine, "unemployment benefits", "en") {
        IntentOutcome::NeedsClarification {
            category,
            confidence,
            ..
        } => {
            assert_eq!(category, Category::Employment);
            assert!((confidence - 0.4).abs() < 1e-6);
        }
        other => panic!("expected clarification, got {other:?}"),
    }

    let outcome = classify(engine, "selfharm thoughts", "en");
    assert_eq!(outcome.resource_category(), Some(Category::Crisis));

    assert_eq!(
        classify(engine, "i'm underemployed", "en").category(),
        Some(Category::Employment)
    );
}

#[test]
fn test_short_stems_ignore_unrelated_words() {
    let engine = engine();
    assert_eq!(
        classify(engine, "I need a different doctor", "en").category(),
        Some(Category::Healthcare)
    );
    assert!(classify(engine, "what time does the bus come", "en").is_general());
    assert!(engine.explain("the pharmacy is closed", Language::En).ranked.is_empty());
}

#[test]
fn test_unsupported_language_uses_english() {
    let outcome = classify(engine(), "I need food", "fr");
    assert_eq!(outcome.resource_category(), Some(Category::Food));
}

#[test]
fn test_spanish_scenarios() {
    let engine = engine();
    assert_eq!(
        classify(engine, "necesito comida", "es").resource_category(),
        Some(Category::Food)
    );
    assert_eq!(
        classify(engine, "ayuda con el alquiler", "es").resource_category(),
        Some(Category::Housing)
    );
    assert!(classify(engine, "hola", "es").is_general());
    assert!(classify(engine, "unicornio mágico", "es").is_nonsensical());
    assert!(classify(engine, "no necesito comida", "es")
        .resource_category()
        .is_none());
}

#[test]
fn test_somali_scenarios() {
    let engine = engine();
    assert_eq!(
        classify(engine, "waxaan u baahan cunto", "so").resource_category(),
        Some(Category::Food)
    );
    assert!(classify(engine, "mahadsanid", "so").is_general());
    // Somali has no nonsense patterns of its own
    assert!(classify(engine, "dragon", "so").is_nonsensical());
}

#[test]
fn test_arabic_scenarios() {
    let engine = engine();
    assert_eq!(
        classify(engine, "أحتاج إلى طعام", "ar").resource_category(),
        Some(Category::Food)
    );
    assert_eq!(
        classify(engine, "أحتاج مساعدة في الإيجار", "ar").resource_category(),
        Some(Category::Housing)
    );
    assert!(classify(engine, "مرحبا", "ar").is_general());
}

#[test]
fn test_hindi_scenarios() {
    let engine = engine();
    assert_eq!(
        classify(engine, "मुझे नौकरी चाहिए", "hi").resource_category(),
        Some(Category::Employment)
    );
    assert!(classify(engine, "नमस्ते", "hi").is_general());

    let (outcome, slot) = engine.classify("चिंता", Language::Hi, &ClarificationSlot::empty());
    assert!(matches!(
        outcome,
        IntentOutcome::NeedsClarification {
            category: Category::MentalHealth,
            ..
        }
    ));
    let (outcome, _) = engine.classify("हाँ", Language::Hi, &slot);
    assert_eq!(outcome, IntentOutcome::confirmed(Category::MentalHealth));
}

#[test]
fn test_negation_prefix_dampens_resources() {
    let engine = engine();
    let texts = [
        "I need food",
        "help with rent",
        "I need a job",
        "suicide hotline",
        "I am a veteran",
        "mental health support",
    ];

    for text in texts {
        let outcome = classify(engine, text, "en");
        let category = outcome
            .resource_category()
            .unwrap_or_else(|| panic!("{text} should be a resource, got {outcome:?}"));
        let conf = outcome.confidence();

        for prefix in ["I don't need ", "never "] {
            let negated = format!("{prefix}{text}");
            let damped = confidence_for(engine, &negated, category);
            assert!(
                damped <= 0.3 * conf + 1e-6,
                "{negated}: {damped} > 0.3 * {conf}"
            );
        }
    }
}

#[test]
fn test_every_builtin_lexicon_has_every_category() {
    for language in Language::ALL {
        let spec = LexiconSpec::builtin(language).unwrap();
        for category in Category::ALL {
            let entry = spec
                .categories
                .iter()
                .find(|e| e.category == category)
                .unwrap_or_else(|| panic!("{language} lacks {category}"));
            assert!(!entry.keywords.is_empty());
            assert!(!entry.phrases.is_empty());
        }
        assert!(!spec.negations.is_empty());
        assert!(!spec.affirmations.is_empty());
    }
}

fn food_keywords() -> Vec<String> {
    LexiconSpec::builtin(Language::En)
        .unwrap()
        .categories
        .into_iter()
        .find(|e| e.category == Category::Food)
        .map(|e| e.keywords)
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn prop_classification_is_deterministic(text in "\\PC{0,80}") {
        let engine = engine();
        let first = classify(engine, &text, "en");
        let second = classify(engine, &text, "en");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_confidence_is_bounded(prefix in "\\PC{0,40}", repeats in 1usize..40) {
        let engine = engine();
        let text = format!("{} {}", prefix, "need food crisis suicide hotline ".repeat(repeats));

        let outcome = classify(engine, &text, "en");
        prop_assert!((0.0..=1.0).contains(&outcome.confidence()));
        for m in engine.explain(&text, Language::En).ranked {
            prop_assert!((0.0..=1.0).contains(&m.confidence));
        }
    }

    #[test]
    fn prop_extra_keyword_never_lowers_score(
        mask in proptest::collection::vec(any::<bool>(), 12),
        extra in 0usize..12,
    ) {
        let engine = engine();
        let keywords = food_keywords();
        let base: Vec<&str> = keywords
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(k, _)| k.as_str())
            .collect();
        let base_text = base.join(" ");
        let more_text = format!("{} {}", base_text, keywords[extra % keywords.len()]);

        let score = |text: &str| {
            engine
                .explain(text, Language::En)
                .ranked
                .iter()
                .find(|m| m.category == Category::Food)
                .map(|m| (m.raw_score, m.confidence))
                .unwrap_or((0.0, 0.0))
        };

        let (raw_before, conf_before) = score(&base_text);
        let (raw_after, conf_after) = score(&more_text);
        prop_assert!(raw_after >= raw_before);
        prop_assert!(conf_after >= conf_before);
    }
}
