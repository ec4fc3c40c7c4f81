//! The three interview request types, composed from the prompt builders and
//! the LLM client. Each call is asynchronous and single-shot; every call
//! spends one unit of provider quota — nothing is cached or deduplicated.

use thiserror::Error;
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::session::models::{FeedbackReport, InterviewMessage};
use crate::session::prompts::{
    build_feedback_prompt, build_first_question_prompt, build_next_question_prompt,
    feedback_response_schema,
};

/// Failure modes of the feedback call. A payload that parses but breaks the
/// score contract is an `InvalidFormat`, not a request failure — the caller
/// surfaces the two differently.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback request failed: {0}")]
    Request(LlmError),

    #[error("feedback payload out of contract: {0}")]
    InvalidFormat(String),
}

pub async fn request_first_question(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = build_first_question_prompt(resume, job_description);
    llm.generate_text(&prompt).await
}

pub async fn request_next_question(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
    transcript: &[InterviewMessage],
) -> Result<String, LlmError> {
    let prompt = build_next_question_prompt(resume, job_description, transcript);
    llm.generate_text(&prompt).await
}

/// Requests the structured feedback report over the full transcript. The
/// response schema constrains the model, but the payload is validated again
/// here: missing fields and out-of-range scores are rejected.
pub async fn request_feedback(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
    transcript: &[InterviewMessage],
) -> Result<FeedbackReport, FeedbackError> {
    let prompt = build_feedback_prompt(resume, job_description, transcript);
    let report: FeedbackReport = llm
        .generate_json(&prompt, feedback_response_schema())
        .await
        .map_err(|e| match e {
            LlmError::Parse(parse_err) => {
                warn!("feedback payload failed to parse: {parse_err}");
                FeedbackError::InvalidFormat(parse_err.to_string())
            }
            other => FeedbackError::Request(other),
        })?;

    report.validate().map_err(|reason| {
        warn!("feedback payload rejected: {reason}");
        FeedbackError::InvalidFormat(reason)
    })?;

    Ok(report)
}
