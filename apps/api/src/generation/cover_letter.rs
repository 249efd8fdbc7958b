//! Cover letter generation.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::generation::coercer::clean_text;
use crate::generation::prompts::{build_prompt, PromptRequest};
use crate::generation::upstream_error;
use crate::llm_client::TextGenerator;

const COVER_LETTER_FAILED: &str = "Failed to generate cover letter. Please try again.";

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company: String,
    pub resume_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    request: &CoverLetterRequest,
) -> Result<String, AppError> {
    let prompt = build_prompt(&PromptRequest::CoverLetter {
        job_title: &request.job_title,
        company: &request.company,
        resume_text: &request.resume_text,
    });

    info!(
        "Generating cover letter for '{}' at '{}'",
        request.job_title, request.company
    );
    let raw = llm.generate(&prompt).await.map_err(|e| {
        error!("Cover letter generation failed: {e}");
        upstream_error(e, COVER_LETTER_FAILED)
    })?;

    Ok(clean_text(&raw))
}
