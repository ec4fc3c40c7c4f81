//! Prompt builders for the three interview LLM calls.
//!
//! All builders are pure string rendering: no validation, no side effects,
//! no network access. Empty resume/JD/transcript inputs render as empty
//! sections rather than errors — input validation belongs to the handlers.

use serde_json::{json, Value};

use crate::session::models::InterviewMessage;

/// First-question prompt. Replace `{resume}` and `{job_description}`.
const FIRST_QUESTION_TEMPLATE: &str = r#"You are an expert interview coach. Your goal is to conduct a realistic and challenging job interview.

User's Resume:
---
{resume}
---

Job Description:
---
{job_description}
---

Task: Based on the user's resume and the target job description, generate the first interview question. The question should be relevant and insightful. It can be behavioral, technical, or situational. Ask only one question to start."#;

/// Follow-up question prompt. Replace `{resume}`, `{job_description}`,
/// `{transcript}`.
const NEXT_QUESTION_TEMPLATE: &str = r#"You are an expert interview coach continuing an interview. Be adaptive. Ask relevant follow-up questions based on the conversation history. Do not repeat questions. Keep the interview flowing naturally.

User's Resume:
---
{resume}
---

Job Description:
---
{job_description}
---

Interview Transcript (so far):
---
{transcript}
---

Task: Generate the next single interview question."#;

/// Feedback prompt. Replace `{resume}`, `{job_description}`, `{transcript}`.
/// The JSON shape itself is enforced through the response schema, not prose.
const FEEDBACK_TEMPLATE: &str = r#"You are an expert career coach and interview analyst. Your task is to provide a comprehensive, constructive, and detailed feedback report on the following job interview transcript. Be critical but encouraging. Provide specific examples from the transcript to support your analysis.

User's Resume:
---
{resume}
---

Job Description:
---
{job_description}
---

Full Interview Transcript:
---
{transcript}
---

Task: Analyze the transcript and provide feedback in the specified JSON format."#;

/// Serializes a transcript for prompt embedding: `SPEAKER: text` lines in
/// chronological order, separated by blank lines.
pub fn format_transcript(transcript: &[InterviewMessage]) -> String {
    transcript
        .iter()
        .map(|msg| format!("{}: {}", msg.speaker.tag(), msg.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_first_question_prompt(resume: &str, job_description: &str) -> String {
    FIRST_QUESTION_TEMPLATE
        .replace("{resume}", resume)
        .replace("{job_description}", job_description)
}

pub fn build_next_question_prompt(
    resume: &str,
    job_description: &str,
    transcript: &[InterviewMessage],
) -> String {
    NEXT_QUESTION_TEMPLATE
        .replace("{resume}", resume)
        .replace("{job_description}", job_description)
        .replace("{transcript}", &format_transcript(transcript))
}

pub fn build_feedback_prompt(
    resume: &str,
    job_description: &str,
    transcript: &[InterviewMessage],
) -> String {
    FEEDBACK_TEMPLATE
        .replace("{resume}", resume)
        .replace("{job_description}", job_description)
        .replace("{transcript}", &format_transcript(transcript))
}

/// Gemini response schema for the feedback call. All eight leaf fields are
/// mandatory; every score is a 0-100 number.
pub fn feedback_response_schema() -> Value {
    let scored_section = |what: &str| {
        json!({
            "type": "OBJECT",
            "properties": {
                "score": {"type": "NUMBER", "description": format!("A score from 0-100 for {what}.")},
                "analysis": {"type": "STRING", "description": format!("Detailed analysis of {what}.")},
                "suggestions": {"type": "STRING", "description": format!("Actionable advice for improving {what}.")}
            },
            "required": ["score", "analysis", "suggestions"]
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "overallScore": {
                "type": "OBJECT",
                "properties": {
                    "score": {"type": "NUMBER", "description": "A score from 0-100."},
                    "summary": {"type": "STRING", "description": "A brief summary of the performance."}
                },
                "required": ["score", "summary"]
            },
            "answerQuality": scored_section("answer quality"),
            "communicationSkills": scored_section("communication skills"),
            "contentAndStrategy": scored_section("content and strategy"),
        },
        "required": ["overallScore", "answerQuality", "communicationSkills", "contentAndStrategy"]
    })
}
