//! Email subject generation. Unlike the other generators, any upstream failure
//! is absorbed into a templated subject so the send flow can continue.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::coercer::{clean_subject, truncate_subject, Coerced};
use crate::generation::prompts::{build_prompt, PromptRequest};
use crate::llm_client::TextGenerator;

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRequest {
    pub job_title: String,
    pub company: String,
    pub cover_letter_content: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectResponse {
    pub subject: String,
    pub job_title: String,
    pub company: String,
    /// True when the subject is the template rather than model output.
    pub fallback: bool,
}

/// The literal template, only length-capped. Request fields are kept as sent.
pub fn fallback_subject(job_title: &str, company: &str) -> String {
    truncate_subject(&format!("Job Application: {job_title} at {company}"))
}

/// Never fails. An upstream error, or a reply that cleans up to nothing,
/// yields `Coerced::Fallback` with the templated subject.
pub async fn generate_subject(llm: &dyn TextGenerator, request: &SubjectRequest) -> Coerced<String> {
    let prompt = build_prompt(&PromptRequest::SubjectLine {
        job_title: &request.job_title,
        company: &request.company,
        cover_letter_content: &request.cover_letter_content,
        job_description: request.job_description.as_deref(),
    });

    match llm.generate(&prompt).await {
        Ok(raw) => {
            let subject = clean_subject(&raw);
            if subject.is_empty() {
                warn!("Model returned an empty subject, using fallback");
                return Coerced::Fallback(fallback_subject(&request.job_title, &request.company));
            }
            info!("Generated subject: {subject}");
            Coerced::Recovered(subject)
        }
        Err(e) => {
            warn!("Subject generation failed, using fallback: {e}");
            Coerced::Fallback(fallback_subject(&request.job_title, &request.company))
        }
    }
}
