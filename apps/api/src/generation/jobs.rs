//! Job search. Asks the model for mock postings and coerces the reply.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::generation::coercer::{coerce_job_postings, Coerced, JobPosting};
use crate::generation::prompts::{build_prompt, PromptRequest};
use crate::generation::upstream_error;
use crate::llm_client::TextGenerator;

const JOB_SEARCH_FAILED: &str =
    "Failed to generate job listings. Please check your API quota and try again.";

#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchRequest {
    pub title: String,
    pub location: String,
    /// Compensation band, e.g. "10-15 LPA".
    #[serde(default)]
    pub ctc: Option<String>,
}

/// Generates mock postings for the requested role.
///
/// Upstream failures are returned as errors. Once the model has answered, the
/// result is always usable: a parsed list, or a single fallback posting.
pub async fn search_jobs(
    llm: &dyn TextGenerator,
    request: &JobSearchRequest,
) -> Result<Coerced<Vec<JobPosting>>, AppError> {
    let prompt = build_prompt(&PromptRequest::JobSearch {
        title: &request.title,
        location: &request.location,
        ctc: request.ctc.as_deref(),
    });

    info!(
        "Generating job listings for '{}' in '{}'",
        request.title, request.location
    );
    let raw = llm.generate(&prompt).await.map_err(|e| {
        error!("Job search generation failed: {e}");
        upstream_error(e, JOB_SEARCH_FAILED)
    })?;

    let result = coerce_job_postings(&raw, &request.title, &request.location);
    match &result {
        Coerced::Recovered(postings) => info!("Recovered {} job postings", postings.len()),
        Coerced::Fallback(_) => warn!("Returning fallback job posting for '{}'", request.title),
    }
    Ok(result)
}
