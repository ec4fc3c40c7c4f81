//! HTTP surface of the session controller. Each handler runs one transition:
//! guard + begin under the store lock, the AI call with the lock released,
//! then the completion under the lock again.
//!
//! AI-call failures do not become HTTP errors — they are absorbed into the
//! session (error string set, phase reverted) and the updated view is
//! returned with 200. HTTP errors are reserved for failures that happen
//! before a transition begins: bad input, unreadable PDFs, unknown session
//! ids, and guard rejections.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::{self, extract_resume_text};
use crate::session::interviewer::{
    request_feedback, request_first_question, request_next_question, FeedbackError,
};
use crate::session::machine::{
    begin_answer, begin_end, begin_start, complete_answer, complete_end, complete_start,
    start_new, TransitionError, FEEDBACK_FAILED, FEEDBACK_INVALID_FORMAT, NEXT_QUESTION_FAILED,
    START_FAILED,
};
use crate::session::models::{FeedbackReport, InterviewMessage, SessionContext, SessionPhase};
use crate::state::AppState;

const MISSING_INPUTS: &str = "Please upload a resume and provide the job description.";
const MISSING_ANSWER: &str = "Please provide an answer before submitting.";

/// What the client renders. A direct projection of `SessionContext`, minus
/// the resume text (the client never needs it back).
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub transcript: Vec<InterviewMessage>,
    pub feedback: Option<FeedbackReport>,
    pub loading: bool,
    pub error: Option<String>,
    /// Retained across StartNew so the setup form can be prefilled.
    pub job_description: String,
}

impl From<&SessionContext> for SessionView {
    fn from(ctx: &SessionContext) -> Self {
        SessionView {
            id: ctx.id,
            phase: ctx.phase,
            transcript: ctx.transcript.clone(),
            feedback: ctx.feedback.clone(),
            loading: ctx.loading,
            error: ctx.last_error.clone(),
            job_description: ctx.job_description.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

/// POST /api/v1/sessions — StartInterview.
/// Multipart form: `resume` (PDF file) + `job_description` (text field).
pub async fn handle_start_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let mut resume_bytes: Option<Vec<u8>> = None;
    let mut resume_is_pdf = true;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        match field.name() {
            Some("resume") => {
                let looks_like_pdf = field
                    .content_type()
                    .map(|ct| ct == "application/pdf")
                    .or_else(|| {
                        field
                            .file_name()
                            .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
                    })
                    .unwrap_or(true);
                resume_is_pdf = looks_like_pdf;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume_bytes = Some(bytes.to_vec());
            }
            Some("job_description") => {
                job_description = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
            }
            _ => {}
        }
    }

    // Input validation: no transition, no AI call.
    let resume_bytes = match resume_bytes {
        Some(bytes) if !bytes.is_empty() && !job_description.trim().is_empty() => bytes,
        _ => return Err(AppError::Validation(MISSING_INPUTS.to_string())),
    };
    if !resume_is_pdf {
        return Err(AppError::Validation(intake::NOT_A_PDF.to_string()));
    }

    let resume_text = extract_resume_text(&resume_bytes)?;

    let mut ctx = SessionContext::new();
    let id = ctx.id;
    begin_start(&mut ctx, resume_text, job_description)?;
    state.sessions.insert(ctx.clone()).await;
    info!(session = %id, "interview session starting");

    let outcome = request_first_question(&state.llm, &ctx.resume_text, &ctx.job_description)
        .await
        .map_err(|e| {
            error!(session = %id, "first question request failed: {e}");
            START_FAILED.to_string()
        });

    let view = state
        .sessions
        .update(id, |ctx| {
            complete_start(ctx, outcome);
            SessionView::from(&*ctx)
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id — current view, driven purely by the phase.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let ctx = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(Json(SessionView::from(&ctx)))
}

/// POST /api/v1/sessions/:id/answers — SubmitAnswer.
/// The user message is appended before the AI call and survives its failure.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_ANSWER.to_string()));
    }

    // Begin under the lock; take the snapshot the prompt needs.
    let snapshot = state
        .sessions
        .update(id, |ctx| {
            begin_answer(ctx, req.text.clone())?;
            Ok::<_, TransitionError>((
                ctx.resume_text.clone(),
                ctx.job_description.clone(),
                ctx.transcript.clone(),
            ))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;

    let (resume, job_description, transcript) = snapshot;
    let outcome = request_next_question(&state.llm, &resume, &job_description, &transcript)
        .await
        .map_err(|e| {
            error!(session = %id, "next question request failed: {e}");
            NEXT_QUESTION_FAILED.to_string()
        });

    let view = state
        .sessions
        .update(id, |ctx| {
            complete_answer(ctx, outcome);
            SessionView::from(&*ctx)
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/end — EndInterview.
/// On failure the transcript is untouched and the phase reverts to Interview.
pub async fn handle_end_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let snapshot = state
        .sessions
        .update(id, |ctx| {
            begin_end(ctx)?;
            Ok::<_, TransitionError>((
                ctx.resume_text.clone(),
                ctx.job_description.clone(),
                ctx.transcript.clone(),
            ))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;

    let (resume, job_description, transcript) = snapshot;
    let outcome = request_feedback(&state.llm, &resume, &job_description, &transcript)
        .await
        .map_err(|e| {
            error!(session = %id, "feedback request failed: {e}");
            match e {
                FeedbackError::InvalidFormat(_) => FEEDBACK_INVALID_FORMAT.to_string(),
                FeedbackError::Request(_) => FEEDBACK_FAILED.to_string(),
            }
        });

    let view = state
        .sessions
        .update(id, |ctx| {
            complete_end(ctx, outcome);
            SessionView::from(&*ctx)
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    if view.phase == SessionPhase::Feedback {
        info!(session = %id, "feedback report generated");
    }
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/restart — StartNew.
/// Clears everything except the job description.
pub async fn handle_start_new(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(id, |ctx| {
            start_new(ctx)?;
            Ok::<_, TransitionError>(SessionView::from(&*ctx))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;

    info!(session = %id, "session reset for a new practice round");
    Ok(Json(view))
}
