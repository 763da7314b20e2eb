//! Carelink+ intent service
//!
//! Exposes the intent classifiers over HTTP: a stateless `/api/intent`
//! endpoint in the widget's external intent shape and a session-aware
//! `/api/chat` endpoint that carries clarification state between turns.

pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
