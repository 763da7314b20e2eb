//! HTTP routes and handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use carelink_classifiers::{prompts, Strategy};
use carelink_core::{ClarificationSlot, ExternalIntent, IntentOutcome, Language};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/intent", post(detect_intent))
        .route("/api/chat", post(chat))
        .route("/api/sessions/:id", delete(reset_session))
        .fallback(fallback)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Stateless intent detection request
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub success: bool,
    pub intent: ExternalIntent,
    pub outcome: IntentOutcome,
    pub strategy: Strategy,
}

/// Classify a single message without conversation state
async fn detect_intent(
    State(state): State<AppState>,
    Json(req): Json<IntentRequest>,
) -> Result<Json<IntentResponse>, AppError> {
    metrics::counter!("carelink_requests_total", "endpoint" => "intent").increment(1);
    let message = require_message(&req.message)?;
    let language = state.language(req.language.as_deref());

    let (outcome, strategy) = state.classifier.detect_with_source(message, language).await;
    debug!(
        language = %language,
        outcome = outcome.label(),
        strategy = %strategy,
        "Intent detected"
    );

    Ok(Json(IntentResponse {
        success: true,
        intent: outcome.to_external(),
        outcome,
        strategy,
    }))
}

/// One conversational turn
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub language: Language,
    pub outcome: IntentOutcome,
    pub intent: ExternalIntent,
    /// Localized assistant reply
    pub reply: String,
    /// Whether resources for `intent.category` should be displayed now
    pub show_resources: bool,
    /// Slot carried into the session's next turn
    pub slot: ClarificationSlot,
    pub strategy: Strategy,
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    metrics::counter!("carelink_requests_total", "endpoint" => "chat").increment(1);
    let message = require_message(&req.message)?;
    let language = state.language(req.language.as_deref());
    let session_id = req
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Held for the whole turn so turns within a session apply in order
    let session = state.sessions.session(&session_id);
    let mut slot = session.lock().await;
    let turn = state.classifier.classify_turn(message, language, &slot).await;
    *slot = turn.slot.clone();
    drop(slot);

    debug!(
        session = %session_id,
        outcome = turn.outcome.label(),
        awaiting = turn.slot.awaiting,
        strategy = %turn.strategy,
        "Chat turn classified"
    );

    Ok(Json(ChatResponse {
        reply: prompts::render(language, turn.outcome.reply_key()),
        show_resources: turn.outcome.resource_category().is_some(),
        intent: turn.outcome.to_external(),
        session_id,
        language,
        outcome: turn.outcome,
        slot: turn.slot,
        strategy: turn.strategy,
    }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.reset(&id) {
        info!(session = %id, "Session reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("unknown session '{}'", id)))
    }
}

async fn fallback() -> impl IntoResponse {
    AppError::NotFound("Not found".to_string())
}

fn require_message(message: &str) -> Result<&str, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidRequest(
            "Missing message in request body".to_string(),
        ));
    }
    Ok(message)
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg, "invalid_request_error")
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found_error"),
        };

        metrics::counter!("carelink_errors_total", "type" => kind).increment(1);

        let body = json!({
            "success": false,
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
