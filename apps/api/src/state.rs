use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::mail::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Gemini client in production; swapped for a scripted fake in tests.
    pub llm: Arc<dyn TextGenerator>,
    /// SMTP mailer, or the dry-run mailer when MAIL_DRY_RUN is set.
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
