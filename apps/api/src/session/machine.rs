//! The session state machine: Setup → Interview (⟲) → Loading → Feedback.
//!
//! Every AI-backed transition is split into a `begin_*` / `complete_*` pair
//! around the network suspension point. The functions here are pure state
//! mutations — no network, no clock beyond timestamps — so the whole machine
//! is unit-testable without an LLM.
//!
//! Guards enforce strict serialization: while `loading` is set, every
//! user-triggered transition is rejected with `Busy`. There is therefore at
//! most one request in flight per session, and a completion can never land
//! on a session that moved on underneath it.

use thiserror::Error;

use crate::session::models::{FeedbackReport, InterviewMessage, SessionContext, SessionPhase};

/// User-facing message when the first-question call fails.
pub const START_FAILED: &str =
    "Failed to start the interview. Please check your API key and try again.";
/// User-facing message when a follow-up question call fails.
pub const NEXT_QUESTION_FAILED: &str = "Failed to get the next question. Please try again.";
/// User-facing message when the feedback call fails.
pub const FEEDBACK_FAILED: &str =
    "Failed to generate feedback report. Please try starting a new interview.";
/// User-facing message when the feedback payload parses but breaks contract.
pub const FEEDBACK_INVALID_FORMAT: &str =
    "The AI returned an invalid feedback format. Please try again.";

/// A rejected transition. No state is modified when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{action} is not valid in the {phase:?} phase")]
    InvalidPhase {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error("{action} rejected: a request is already in flight")]
    Busy { action: &'static str },
}

fn guard(
    ctx: &SessionContext,
    action: &'static str,
    expected: SessionPhase,
) -> Result<(), TransitionError> {
    if ctx.loading {
        return Err(TransitionError::Busy { action });
    }
    if ctx.phase != expected {
        return Err(TransitionError::InvalidPhase {
            action,
            phase: ctx.phase,
        });
    }
    Ok(())
}

/// StartInterview, before the first-question call. Valid only in Setup.
/// The only transition that resets resume, transcript, and report together.
pub fn begin_start(
    ctx: &mut SessionContext,
    resume_text: String,
    job_description: String,
) -> Result<(), TransitionError> {
    guard(ctx, "StartInterview", SessionPhase::Setup)?;
    ctx.loading = true;
    ctx.last_error = None;
    ctx.resume_text = resume_text;
    ctx.job_description = job_description;
    ctx.transcript.clear();
    ctx.feedback = None;
    ctx.touch();
    Ok(())
}

/// StartInterview, after the call resolves. `Err` carries the user-facing
/// message; on failure the session returns to Setup with an empty transcript.
pub fn complete_start(ctx: &mut SessionContext, outcome: Result<String, String>) {
    match outcome {
        Ok(first_question) => {
            ctx.transcript = vec![InterviewMessage::ai(first_question)];
            ctx.phase = SessionPhase::Interview;
        }
        Err(message) => {
            ctx.last_error = Some(message);
            ctx.phase = SessionPhase::Setup;
        }
    }
    ctx.loading = false;
    ctx.touch();
}

/// SubmitAnswer, before the next-question call. Valid only in Interview.
/// The user's message is appended optimistically — it stays in the
/// transcript whether or not the AI call succeeds.
pub fn begin_answer(ctx: &mut SessionContext, answer: String) -> Result<(), TransitionError> {
    guard(ctx, "SubmitAnswer", SessionPhase::Interview)?;
    ctx.transcript.push(InterviewMessage::user(answer));
    ctx.loading = true;
    ctx.last_error = None;
    ctx.touch();
    Ok(())
}

/// SubmitAnswer, after the call resolves. On failure no `ai` message is
/// appended; the phase stays Interview and the user may retry or end.
pub fn complete_answer(ctx: &mut SessionContext, outcome: Result<String, String>) {
    match outcome {
        Ok(next_question) => ctx.transcript.push(InterviewMessage::ai(next_question)),
        Err(message) => ctx.last_error = Some(message),
    }
    ctx.loading = false;
    ctx.touch();
}

/// EndInterview, before the feedback call. Valid only in Interview.
pub fn begin_end(ctx: &mut SessionContext) -> Result<(), TransitionError> {
    guard(ctx, "EndInterview", SessionPhase::Interview)?;
    ctx.loading = true;
    ctx.last_error = None;
    ctx.phase = SessionPhase::Loading;
    ctx.touch();
    Ok(())
}

/// EndInterview, after the call resolves. On failure the phase reverts to
/// Interview with the transcript untouched, so the user may continue
/// answering or retry ending.
pub fn complete_end(ctx: &mut SessionContext, outcome: Result<FeedbackReport, String>) {
    match outcome {
        Ok(report) => {
            ctx.feedback = Some(report);
            ctx.phase = SessionPhase::Feedback;
        }
        Err(message) => {
            ctx.last_error = Some(message);
            ctx.phase = SessionPhase::Interview;
        }
    }
    ctx.loading = false;
    ctx.touch();
}

/// StartNew: back to Setup for another practice round. Valid in any phase
/// as long as no request is in flight. Clears resume, transcript, report,
/// and error; the job description is deliberately retained for convenience.
pub fn start_new(ctx: &mut SessionContext) -> Result<(), TransitionError> {
    if ctx.loading {
        return Err(TransitionError::Busy { action: "StartNew" });
    }
    ctx.phase = SessionPhase::Setup;
    ctx.resume_text.clear();
    ctx.transcript.clear();
    ctx.feedback = None;
    ctx.last_error = None;
    ctx.touch();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::{FeedbackSection, OverallScore, Speaker};

    const RESUME: &str = "Senior Backend Engineer, 5 yrs Go...";
    const JD: &str = "Staff SRE role...";

    fn sample_report() -> FeedbackReport {
        let section = |score| FeedbackSection {
            score,
            analysis: "analysis".to_string(),
            suggestions: "suggestions".to_string(),
        };
        FeedbackReport {
            overall_score: OverallScore {
                score: 82.0,
                summary: "Solid performance".to_string(),
            },
            answer_quality: section(78.0),
            communication_skills: section(85.0),
            content_and_strategy: section(80.0),
        }
    }

    fn interview_ctx() -> SessionContext {
        let mut ctx = SessionContext::new();
        begin_start(&mut ctx, RESUME.to_string(), JD.to_string()).unwrap();
        complete_start(&mut ctx, Ok("Q1".to_string()));
        ctx
    }

    #[test]
    fn test_start_success_yields_single_ai_message_and_interview_phase() {
        let mut ctx = SessionContext::new();
        begin_start(&mut ctx, RESUME.to_string(), JD.to_string()).unwrap();
        assert!(ctx.loading);

        complete_start(
            &mut ctx,
            Ok("Tell me about a time you debugged a production outage.".to_string()),
        );

        assert_eq!(ctx.phase, SessionPhase::Interview);
        assert_eq!(ctx.transcript.len(), 1);
        assert_eq!(ctx.transcript[0].speaker, Speaker::Ai);
        assert_eq!(
            ctx.transcript[0].text,
            "Tell me about a time you debugged a production outage."
        );
        assert!(!ctx.loading);
        assert!(ctx.last_error.is_none());
    }

    #[test]
    fn test_start_failure_stays_in_setup_with_error() {
        let mut ctx = SessionContext::new();
        begin_start(&mut ctx, RESUME.to_string(), JD.to_string()).unwrap();
        complete_start(&mut ctx, Err(START_FAILED.to_string()));

        assert_eq!(ctx.phase, SessionPhase::Setup);
        assert!(ctx.transcript.is_empty());
        assert_eq!(
            ctx.last_error.as_deref(),
            Some("Failed to start the interview. Please check your API key and try again.")
        );
        assert!(!ctx.loading);
    }

    #[test]
    fn test_start_is_rejected_outside_setup() {
        let mut ctx = interview_ctx();
        let err = begin_start(&mut ctx, RESUME.to_string(), JD.to_string()).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidPhase { .. }));
    }

    #[test]
    fn test_start_resets_previous_transcript_and_report() {
        let mut ctx = interview_ctx();
        begin_end(&mut ctx).unwrap();
        complete_end(&mut ctx, Ok(sample_report()));
        start_new(&mut ctx).unwrap();

        begin_start(&mut ctx, "new resume".to_string(), JD.to_string()).unwrap();
        assert!(ctx.transcript.is_empty());
        assert!(ctx.feedback.is_none());
    }

    #[test]
    fn test_answer_is_appended_optimistically_even_on_failure() {
        let mut ctx = interview_ctx();
        let before = ctx.transcript.clone();

        begin_answer(&mut ctx, "A1".to_string()).unwrap();
        complete_answer(&mut ctx, Err(NEXT_QUESTION_FAILED.to_string()));

        assert_eq!(ctx.transcript.len(), before.len() + 1);
        assert_eq!(ctx.transcript.last().unwrap().speaker, Speaker::User);
        assert_eq!(ctx.transcript.last().unwrap().text, "A1");
        assert!(ctx.last_error.is_some());
        assert_eq!(ctx.phase, SessionPhase::Interview);
    }

    #[test]
    fn test_answer_success_appends_ai_followup() {
        let mut ctx = interview_ctx();
        begin_answer(&mut ctx, "A1".to_string()).unwrap();
        complete_answer(&mut ctx, Ok("Q2".to_string()));

        let tags: Vec<Speaker> = ctx.transcript.iter().map(|m| m.speaker).collect();
        assert_eq!(tags, vec![Speaker::Ai, Speaker::User, Speaker::Ai]);
        assert!(ctx.last_error.is_none());
    }

    #[test]
    fn test_actions_rejected_while_loading() {
        let mut ctx = interview_ctx();
        begin_answer(&mut ctx, "A1".to_string()).unwrap();
        assert!(ctx.loading);

        assert_eq!(
            begin_answer(&mut ctx, "A2".to_string()),
            Err(TransitionError::Busy {
                action: "SubmitAnswer"
            })
        );
        assert!(matches!(
            begin_end(&mut ctx),
            Err(TransitionError::Busy { .. })
        ));
        assert!(matches!(
            start_new(&mut ctx),
            Err(TransitionError::Busy { .. })
        ));
        // The rejected submit must not have touched the transcript.
        assert_eq!(ctx.transcript.last().unwrap().text, "A1");
    }

    #[test]
    fn test_end_failure_leaves_transcript_unchanged_and_reverts_phase() {
        let mut ctx = interview_ctx();
        begin_answer(&mut ctx, "A1".to_string()).unwrap();
        complete_answer(&mut ctx, Ok("Q2".to_string()));
        let before = ctx.transcript.clone();

        begin_end(&mut ctx).unwrap();
        assert_eq!(ctx.phase, SessionPhase::Loading);
        complete_end(&mut ctx, Err(FEEDBACK_FAILED.to_string()));

        assert_eq!(ctx.transcript, before);
        assert_eq!(ctx.phase, SessionPhase::Interview);
        assert!(ctx.feedback.is_none());
        assert!(ctx.last_error.is_some());
    }

    #[test]
    fn test_end_success_stores_report_and_enters_feedback() {
        let mut ctx = interview_ctx();
        begin_end(&mut ctx).unwrap();
        complete_end(&mut ctx, Ok(sample_report()));

        assert_eq!(ctx.phase, SessionPhase::Feedback);
        assert!(ctx.feedback.is_some());
        assert!(!ctx.loading);
    }

    #[test]
    fn test_end_rejected_in_setup() {
        let mut ctx = SessionContext::new();
        assert!(matches!(
            begin_end(&mut ctx),
            Err(TransitionError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_start_new_retains_job_description_and_clears_the_rest() {
        let mut ctx = interview_ctx();
        begin_end(&mut ctx).unwrap();
        complete_end(&mut ctx, Ok(sample_report()));

        start_new(&mut ctx).unwrap();

        assert_eq!(ctx.phase, SessionPhase::Setup);
        assert_eq!(ctx.job_description, JD);
        assert!(ctx.resume_text.is_empty());
        assert!(ctx.transcript.is_empty());
        assert!(ctx.feedback.is_none());
        assert!(ctx.last_error.is_none());
    }

    #[test]
    fn test_start_new_is_valid_mid_interview() {
        let mut ctx = interview_ctx();
        start_new(&mut ctx).unwrap();
        assert_eq!(ctx.phase, SessionPhase::Setup);
    }
}
