//! Remote AI intent classifier
//!
//! Asks an OpenAI-compatible chat completions endpoint for a single category
//! name (or NONE / GENERAL) and maps the reply onto the external intent shape.
//! Any failure surfaces as an error so the caller can fall back to the local
//! engine.

use crate::classifier::{IntentClassifier, Strategy};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use carelink_core::{Category, DecisionBands, Error, ExternalIntent, IntentOutcome, Language, Result};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Confidence given to a recognized category name
pub const REMOTE_CATEGORY_CONFIDENCE: f32 = 0.9;

/// Confidence given to an unrecognized reply
pub const REMOTE_UNCLEAR_CONFIDENCE: f32 = 0.3;

/// Shorter replies must name a category exactly
const MIN_CONTAINED_REPLY_CHARS: usize = 3;

const SYSTEM_PROMPT: &str = "You classify messages sent to a community resource assistant. \
Reply with exactly one of: Food, Housing, Healthcare, Mental Health, Substance Use, \
Employment, Veterans, Crisis, GENERAL or NONE. Nothing else.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat completions classifier
pub struct OpenAiIntentClassifier {
    name: String,
    client: reqwest::Client,
    config: RemoteConfig,
    api_key: Option<String>,
    bands: DecisionBands,
}

impl OpenAiIntentClassifier {
    /// Create a classifier, reading the API key from the configured
    /// environment variable
    pub fn new(config: RemoteConfig, bands: DecisionBands) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::remote(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name: "openai".to_string(),
            api_key: config.api_key(),
            client,
            config,
            bands,
        })
    }

    /// Override the API key
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Whether a credential is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request<'a>(&'a self, text: &str, language: Language) -> ChatCompletionRequest<'a> {
        let user = format!(
            "Language: {}\nMessage: {}\n\n\
             Pick the one category the person clearly needs help with. \
             Greetings, thanks and general questions are GENERAL. \
             Nonsense, fiction or anything unrelated to community resources is NONE.",
            language.code(),
            serde_json::Value::String(text.to_string())
        );

        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Map a model reply onto the external intent shape.
    ///
    /// NONE is nonsensical, GENERAL is conversation, a category name (exact,
    /// or contained either way round for replies of at least three
    /// characters) is that category at 0.9, and anything else is general
    /// at 0.3.
    pub fn interpret_reply(reply: &str) -> ExternalIntent {
        let token = reply
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_uppercase();

        match token.as_str() {
            "NONE" => {
                return ExternalIntent {
                    category: None,
                    confidence: 1.0,
                    is_nonsensical: true,
                    is_general: false,
                    should_escalate: true,
                }
            }
            "GENERAL" => {
                return ExternalIntent {
                    category: None,
                    confidence: 1.0,
                    is_nonsensical: false,
                    is_general: true,
                    should_escalate: false,
                }
            }
            _ => {}
        }

        let upper = |c: &Category| c.as_str().to_uppercase();
        let category = if token.is_empty() {
            None
        } else {
            Category::ALL
                .iter()
                .find(|c| upper(c) == token)
                .or_else(|| {
                    if token.chars().count() < MIN_CONTAINED_REPLY_CHARS {
                        return None;
                    }
                    Category::ALL.iter().find(|c| {
                        let name = upper(c);
                        name.contains(&token) || token.contains(&name)
                    })
                })
                .copied()
        };

        match category {
            Some(category) => ExternalIntent {
                category: Some(category),
                confidence: REMOTE_CATEGORY_CONFIDENCE,
                is_nonsensical: false,
                is_general: false,
                should_escalate: false,
            },
            None => ExternalIntent {
                category: None,
                confidence: REMOTE_UNCLEAR_CONFIDENCE,
                is_nonsensical: false,
                is_general: true,
                should_escalate: false,
            },
        }
    }

    async fn complete(&self, api_key: &str, text: &str, language: Language) -> Result<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.request(text, language))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::remote(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!("API error: {} - {}", status, body)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("invalid response body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::remote("response carried no content"))
    }
}

#[async_trait]
impl IntentClassifier for OpenAiIntentClassifier {
    async fn detect(&self, text: &str, language: Language) -> Result<IntentOutcome> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::unconfigured(format!("{} is not set", self.config.api_key_env))
        })?;

        let start = Instant::now();
        let reply = match self.complete(api_key, text, language).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(classifier = %self.name, error = %err, "Remote classification failed");
                return Err(err);
            }
        };

        let intent = Self::interpret_reply(&reply);
        let outcome = IntentOutcome::from_external(&intent, &self.bands);

        let elapsed = start.elapsed();
        histogram!("carelink_classify_latency_us", "strategy" => "remote_ai")
            .record(elapsed.as_micros() as f64);
        counter!(
            "carelink_intent_outcomes_total",
            "outcome" => outcome.label(),
            "strategy" => "remote_ai"
        )
        .increment(1);

        debug!(
            reply = %reply,
            outcome = outcome.label(),
            latency_us = elapsed.as_micros() as u64,
            "Remote classification"
        );

        Ok(outcome)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn strategy(&self) -> Strategy {
        Strategy::RemoteAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_special_replies() {
        let none = OpenAiIntentClassifier::interpret_reply("NONE");
        assert!(none.is_nonsensical);
        assert!(none.should_escalate);
        assert_eq!(none.confidence, 1.0);

        let general = OpenAiIntentClassifier::interpret_reply(" general. ");
        assert!(general.is_general);
        assert!(!general.should_escalate);
        assert_eq!(general.category, None);
    }

    #[test]
    fn test_interpret_category_names() {
        let exact = OpenAiIntentClassifier::interpret_reply("\"Mental Health\"");
        assert_eq!(exact.category, Some(Category::MentalHealth));
        assert_eq!(exact.confidence, REMOTE_CATEGORY_CONFIDENCE);

        let partial = OpenAiIntentClassifier::interpret_reply("veteran");
        assert_eq!(partial.category, Some(Category::Veterans));

        let wrapped = OpenAiIntentClassifier::interpret_reply("Category: Housing");
        assert_eq!(wrapped.category, Some(Category::Housing));
    }

    #[test]
    fn test_short_replies_need_exact_name() {
        for reply in ["A", "e", "He", "."] {
            let intent = OpenAiIntentClassifier::interpret_reply(reply);
            assert_eq!(intent.category, None, "{reply:?}");
            assert!(intent.is_general);
            assert_eq!(intent.confidence, REMOTE_UNCLEAR_CONFIDENCE);
        }

        let vet = OpenAiIntentClassifier::interpret_reply("vet");
        assert_eq!(vet.category, Some(Category::Veterans));
    }

    #[test]
    fn test_interpret_unexpected_reply() {
        for reply in ["I am not sure", "", "..."] {
            let intent = OpenAiIntentClassifier::interpret_reply(reply);
            assert_eq!(intent.category, None, "{reply:?}");
            assert!(intent.is_general);
            assert_eq!(intent.confidence, REMOTE_UNCLEAR_CONFIDENCE);
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_unconfigured() {
        let classifier = OpenAiIntentClassifier::new(RemoteConfig::default(), DecisionBands::default())
            .unwrap()
            .with_api_key(None);
        assert!(!classifier.is_configured());

        let err = classifier.detect("I need food", Language::En).await.unwrap_err();
        assert!(matches!(err, Error::Unconfigured(_)));
    }

    #[test]
    fn test_request_shape() {
        let classifier = OpenAiIntentClassifier::new(RemoteConfig::default(), DecisionBands::default())
            .unwrap();
        let body = serde_json::to_value(classifier.request("I need \"food\"", Language::Es)).unwrap();

        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 20);
        assert_eq!(body["messages"][0]["role"], "system");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Language: es"));
        assert!(user.contains(r#""I need \"food\"""#));
    }
}
