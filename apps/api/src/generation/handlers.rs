//! Axum route handlers for the Generation API.

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::generation::cover_letter::{generate_cover_letter, CoverLetterRequest, CoverLetterResponse};
use crate::generation::jobs::{search_jobs, JobSearchRequest};
use crate::generation::subject::{generate_subject, SubjectRequest, SubjectResponse};
use crate::state::AppState;

/// Response header telling clients whether job postings came from the model
/// (`recovered`) or from the placeholder (`fallback`).
pub const COERCION_HEADER: HeaderName = HeaderName::from_static("x-coercion");

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// POST /search_jobs
///
/// Returns a JSON array of job postings. A placeholder posting is returned when
/// the model reply cannot be parsed; see the `x-coercion` header.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Json(request): Json<JobSearchRequest>,
) -> Result<Response, AppError> {
    require_non_blank("title", &request.title)?;
    require_non_blank("location", &request.location)?;

    let result = search_jobs(state.llm.as_ref(), &request).await?;
    let marker = if result.is_fallback() {
        HeaderValue::from_static("fallback")
    } else {
        HeaderValue::from_static("recovered")
    };

    Ok(([(COERCION_HEADER, marker)], Json(result.into_inner())).into_response())
}

/// POST /generate_cover
pub async fn handle_generate_cover(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_non_blank("job_title", &request.job_title)?;
    require_non_blank("company", &request.company)?;
    require_non_blank("resume_text", &request.resume_text)?;

    let cover_letter = generate_cover_letter(state.llm.as_ref(), &request).await?;
    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /generate_subject
///
/// Always succeeds for a valid request; upstream failures produce the
/// templated subject with `fallback: true`.
pub async fn handle_generate_subject(
    State(state): State<AppState>,
    Json(request): Json<SubjectRequest>,
) -> Result<Json<SubjectResponse>, AppError> {
    require_non_blank("job_title", &request.job_title)?;
    require_non_blank("company", &request.company)?;

    let subject = generate_subject(state.llm.as_ref(), &request).await;
    let fallback = subject.is_fallback();

    Ok(Json(SubjectResponse {
        subject: subject.into_inner(),
        job_title: request.job_title,
        company: request.company,
        fallback,
    }))
}
