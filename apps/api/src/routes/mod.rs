pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::llm_client;
use crate::session::handlers;
use crate::speech;
use crate::state::AppState;

/// GET /api/v1/capabilities
/// Lets the client discover optional features before rendering its views.
async fn capabilities_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "speech_input": state.speech.is_some(),
        "model": llm_client::MODEL,
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/capabilities", get(capabilities_handler))
        // Session API: the four state-machine transitions plus the view
        .route("/api/v1/sessions", post(handlers::handle_start_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/end",
            post(handlers::handle_end_interview),
        )
        .route(
            "/api/v1/sessions/:id/restart",
            post(handlers::handle_start_new),
        )
        // Optional speech input
        .route(
            "/api/v1/speech/transcriptions",
            post(speech::handle_transcribe),
        )
        .with_state(state)
}
