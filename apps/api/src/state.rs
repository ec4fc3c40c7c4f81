use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::store::SessionStore;
use crate::speech::SpeechTranscriber;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub sessions: SessionStore,
    /// Optional speech-to-text capability. `None` is a valid configuration:
    /// the API runs text-only and reports the absence via /capabilities.
    pub speech: Option<Arc<dyn SpeechTranscriber>>,
    pub config: Config,
}
