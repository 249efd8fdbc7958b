// Generation: job search, cover letter and subject line.
// Each service is Prompt Builder -> TextGenerator -> Response Coercer.
// All model calls go through llm_client; nothing here talks HTTP directly.

pub mod coercer;
pub mod cover_letter;
pub mod handlers;
pub mod jobs;
pub mod prompts;
pub mod subject;

use crate::errors::AppError;
use crate::llm_client::LlmError;

const GEMINI_NOT_CONFIGURED: &str =
    "Gemini API key not configured. Please add GEMINI_API_KEY to .env file.";

/// Maps an upstream failure to the user-facing error for a generation endpoint.
pub(crate) fn upstream_error(err: LlmError, user_message: &str) -> AppError {
    match err {
        LlmError::NotConfigured => AppError::NotConfigured(GEMINI_NOT_CONFIGURED.to_string()),
        _ => AppError::Llm(user_message.to_string()),
    }
}
