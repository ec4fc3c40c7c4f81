//! Optional speech-input collaborator.
//!
//! Speech is a capability, not a dependency: when no transcriber is
//! configured the API still works text-only, `/api/v1/capabilities` reports
//! the absence, and the transcription endpoint answers 501. The session
//! itself only ever consumes final committed text through the normal answer
//! endpoint.

use async_trait::async_trait;
use axum::{extract::Multipart, extract::State, Json};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, Part};
use crate::state::AppState;

const TRANSCRIBE_INSTRUCTION: &str = "Transcribe the spoken audio verbatim. \
    Return only the transcribed text, with no commentary, labels, or timestamps.";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] LlmError),
}

/// Narrow interface over a speech-to-text provider.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String, SpeechError>;
}

/// Transcriber backed by the shared LLM client, sending audio as inline data.
pub struct GeminiTranscriber {
    llm: LlmClient,
}

impl GeminiTranscriber {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SpeechTranscriber for GeminiTranscriber {
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String, SpeechError> {
        debug!("transcribing {} bytes of {mime_type}", audio.len());
        let parts = vec![
            Part::text(TRANSCRIBE_INSTRUCTION),
            Part::inline_data(mime_type, &audio),
        ];
        Ok(self.llm.generate_with_parts(parts).await?)
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// POST /api/v1/speech/transcriptions
/// Multipart form: `audio` (recorded clip). 501 when speech is not enabled.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, AppError> {
    let transcriber = state.speech.as_ref().ok_or(AppError::SpeechUnavailable)?;

    let mut audio: Option<(Bytes, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some("audio") {
            let mime_type = field
                .content_type()
                .unwrap_or("audio/webm")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read audio: {e}")))?;
            audio = Some((bytes, mime_type));
        }
    }

    let (bytes, mime_type) = audio
        .filter(|(bytes, _)| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("Please provide an audio clip.".to_string()))?;

    let text = transcriber
        .transcribe(bytes, &mime_type)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(TranscriptionResponse { text }))
}
