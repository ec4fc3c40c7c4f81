//! Resume ingestion: PDF upload → plain text.

use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

/// User-facing message for a file that is not a PDF at all.
pub const NOT_A_PDF: &str = "Please upload a valid PDF file.";
/// User-facing message for a PDF that could not be read.
pub const UNREADABLE_PDF: &str = "Could not read the provided PDF file. Please try another file.";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("not a PDF file")]
    NotPdf,

    #[error("failed to extract text: {0}")]
    Extraction(String),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::NotPdf => AppError::Validation(NOT_A_PDF.to_string()),
            IntakeError::Extraction(_) => AppError::ResumeExtraction(UNREADABLE_PDF.to_string()),
        }
    }
}

/// Extracts plain text from an uploaded resume PDF. Page order is preserved;
/// pages are separated by newlines in the extractor's output. A corrupt or
/// unreadable file is a reportable error, never a crash.
pub fn extract_resume_text(bytes: &[u8]) -> Result<String, IntakeError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(IntakeError::NotPdf);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| IntakeError::Extraction(e.to_string()))?;

    debug!("extracted {} chars of resume text", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_are_rejected_up_front() {
        let err = extract_resume_text(b"just some text").unwrap_err();
        assert!(matches!(err, IntakeError::NotPdf));
    }

    #[test]
    fn test_truncated_pdf_reports_extraction_error() {
        // Magic bytes present but the document body is garbage.
        let err = extract_resume_text(b"%PDF-1.7 garbage").unwrap_err();
        assert!(matches!(err, IntakeError::Extraction(_)));
    }

    #[test]
    fn test_intake_errors_map_to_user_facing_messages() {
        let validation: AppError = IntakeError::NotPdf.into();
        assert!(matches!(validation, AppError::Validation(msg) if msg == NOT_A_PDF));

        let extraction: AppError = IntakeError::Extraction("broken xref".to_string()).into();
        assert!(matches!(extraction, AppError::ResumeExtraction(msg) if msg == UNREADABLE_PDF));
    }
}
