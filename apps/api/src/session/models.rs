//! Data contracts for an interview session: transcript messages, phases,
//! and the structured feedback report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said a line in the interview transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Ai,
    User,
}

impl Speaker {
    /// Uppercase tag used when serializing a transcript into a prompt.
    pub fn tag(&self) -> &'static str {
        match self {
            Speaker::Ai => "AI",
            Speaker::User => "USER",
        }
    }
}

/// One turn of the interview. Immutable once appended to the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl InterviewMessage {
    pub fn ai(text: impl Into<String>) -> Self {
        InterviewMessage {
            speaker: Speaker::Ai,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        InterviewMessage {
            speaker: Speaker::User,
            text: text.into(),
        }
    }
}

/// Discrete stage of a session. Governs which view is active and which
/// actions are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Setup,
    Interview,
    Loading,
    Feedback,
}

/// Headline score and summary of the whole interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallScore {
    pub score: f64,
    pub summary: String,
}

/// One scored section of the feedback report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSection {
    pub score: f64,
    pub analysis: String,
    pub suggestions: String,
}

/// Structured critique of a completed interview. Produced once per session,
/// immutable, discarded when a new practice round starts.
///
/// Wire format uses camelCase — this is the contract the feedback response
/// schema enforces on the model, and what the client renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub overall_score: OverallScore,
    pub answer_quality: FeedbackSection,
    pub communication_skills: FeedbackSection,
    pub content_and_strategy: FeedbackSection,
}

impl FeedbackReport {
    /// Checks that every score sits in the inclusive 0–100 range. The model
    /// is told the range, but its output is untrusted; an out-of-range score
    /// is out-of-contract even if the payload parsed.
    pub fn validate(&self) -> Result<(), String> {
        let sections = [
            ("overallScore", self.overall_score.score),
            ("answerQuality", self.answer_quality.score),
            ("communicationSkills", self.communication_skills.score),
            ("contentAndStrategy", self.content_and_strategy.score),
        ];
        for (name, score) in sections {
            if !(0.0..=100.0).contains(&score) || !score.is_finite() {
                return Err(format!("{name}.score {score} is outside 0-100"));
            }
        }
        Ok(())
    }
}

/// The whole mutable state of one practice session. Owned by the session
/// store; only the state machine transitions in `machine` mutate it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub resume_text: String,
    pub job_description: String,
    pub transcript: Vec<InterviewMessage>,
    pub feedback: Option<FeedbackReport>,
    /// True while an AI request is in flight. Gates every user-triggered
    /// transition: at most one request per session at a time.
    pub loading: bool,
    /// Last user-facing error, overwritten by the next action. Never a list.
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        let now = Utc::now();
        SessionContext {
            id: Uuid::new_v4(),
            phase: SessionPhase::Setup,
            resume_text: String::new(),
            job_description: String::new(),
            transcript: Vec::new(),
            feedback: None,
            loading: false,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(score: f64) -> FeedbackSection {
        FeedbackSection {
            score,
            analysis: "analysis".to_string(),
            suggestions: "suggestions".to_string(),
        }
    }

    fn report(overall: f64) -> FeedbackReport {
        FeedbackReport {
            overall_score: OverallScore {
                score: overall,
                summary: "summary".to_string(),
            },
            answer_quality: section(70.0),
            communication_skills: section(80.0),
            content_and_strategy: section(90.0),
        }
    }

    #[test]
    fn test_speaker_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Speaker::Ai).unwrap(), r#""ai""#);
        assert_eq!(serde_json::to_string(&Speaker::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_feedback_report_wire_format_is_camel_case() {
        let json = serde_json::to_value(report(85.0)).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("answerQuality").is_some());
        assert!(json.get("communicationSkills").is_some());
        assert!(json.get("contentAndStrategy").is_some());
        assert_eq!(json["overallScore"]["score"], 85.0);
    }

    #[test]
    fn test_feedback_report_requires_all_sections() {
        let missing_section = r#"{
            "overallScore": {"score": 80, "summary": "Good"},
            "answerQuality": {"score": 75, "analysis": "a", "suggestions": "s"},
            "communicationSkills": {"score": 70, "analysis": "a", "suggestions": "s"}
        }"#;
        let result: Result<FeedbackReport, _> = serde_json::from_str(missing_section);
        assert!(result.is_err(), "report without contentAndStrategy must fail");
    }

    #[test]
    fn test_validate_accepts_boundary_scores() {
        let mut r = report(0.0);
        assert!(r.validate().is_ok());
        r.overall_score.score = 100.0;
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_score_above_100() {
        let r = report(150.0);
        let err = r.validate().unwrap_err();
        assert!(err.contains("overallScore"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_negative_section_score() {
        let mut r = report(50.0);
        r.communication_skills.score = -1.0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_new_session_starts_in_setup_and_idle() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.phase, SessionPhase::Setup);
        assert!(ctx.transcript.is_empty());
        assert!(ctx.feedback.is_none());
        assert!(!ctx.loading);
        assert!(ctx.last_error.is_none());
    }
}
