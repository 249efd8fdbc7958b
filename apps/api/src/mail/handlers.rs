//! Axum route handler for sending application emails.

use std::path::{Path, PathBuf};

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::mail::{Delivery, MailAttachment, MailError, OutgoingEmail, ATTACHMENT_NAME};
use crate::state::AppState;

const NO_ATTACHMENT: &str = "No attachment";

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to_emails: Vec<String>,
    pub subject: String,
    pub body: String,
    /// Resume to attach, relative to the RESUME_FILE_PATH directory (or an
    /// absolute path inside it). Defaults to RESUME_FILE_PATH itself.
    #[serde(default)]
    pub resume_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
    pub status: String,
    pub to: Vec<String>,
    pub subject: String,
    pub demo_mode: bool,
    pub attachment: String,
    pub details: String,
}

/// Resolves which file to attach. Without a requested path the configured
/// resume is used. A requested path (relative ones resolve against the resume
/// directory) must stay inside the directory holding `RESUME_FILE_PATH`.
async fn attachment_path(
    requested: Option<&str>,
    configured: Option<&str>,
) -> Result<Option<PathBuf>, AppError> {
    let requested = requested.map(str::trim).filter(|p| !p.is_empty());
    let configured = configured.map(str::trim).filter(|p| !p.is_empty());

    let Some(requested) = requested else {
        return Ok(configured.map(PathBuf::from));
    };
    let Some(configured) = configured else {
        return Err(AppError::Validation(
            "resume_file is only accepted when RESUME_FILE_PATH is configured".to_string(),
        ));
    };

    let resume_dir = match Path::new(configured).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let resume_dir = match tokio::fs::canonicalize(&resume_dir).await {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Resume directory '{}' is not accessible: {e}", resume_dir.display());
            return Ok(None);
        }
    };

    let candidate = resume_dir.join(requested);
    match tokio::fs::canonicalize(&candidate).await {
        Ok(resolved) if resolved.starts_with(&resume_dir) => Ok(Some(resolved)),
        Ok(resolved) => {
            warn!("Rejected resume_file outside the resume directory: {}", resolved.display());
            Err(AppError::Validation(
                "resume_file must be a file in the configured resume directory".to_string(),
            ))
        }
        // Missing file: load_attachment logs it and the mail goes out without one.
        Err(_) => Ok(Some(candidate)),
    }
}

/// Reads the resume if it exists. Problems are logged and the mail goes out
/// without an attachment.
async fn load_attachment(path: Option<&Path>) -> Option<MailAttachment> {
    let path = path?;
    if !path.exists() {
        info!("No resume file attached: '{}' does not exist", path.display());
        return None;
    }
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            info!("Resume attached: {}", path.display());
            Some(MailAttachment {
                file_name: ATTACHMENT_NAME.to_string(),
                bytes,
            })
        }
        Err(e) => {
            warn!("Error attaching resume file '{}': {e}", path.display());
            None
        }
    }
}

/// POST /send_email
///
/// Sends the cover letter as the mail body with the resume attached when one
/// is available. SMTP failures are returned with the relay's diagnostic text.
pub async fn handle_send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let to: Vec<String> = request
        .to_emails
        .iter()
        .map(|addr| addr.trim().to_string())
        .filter(|addr| !addr.is_empty())
        .collect();
    if to.is_empty() {
        return Err(MailError::NoRecipients.into());
    }
    if request.subject.trim().is_empty() {
        return Err(AppError::Validation("subject cannot be empty".to_string()));
    }

    let attachment_path = attachment_path(
        request.resume_file.as_deref(),
        state.config.resume_file_path.as_deref(),
    )
    .await?;
    let attachment = load_attachment(attachment_path.as_deref()).await;
    let attachment_label = attachment
        .as_ref()
        .map(|a| a.file_name.clone())
        .unwrap_or_else(|| NO_ATTACHMENT.to_string());

    let subject = request.subject.trim().to_string();
    let email = OutgoingEmail {
        to: to.clone(),
        subject: subject.clone(),
        body: request.body.trim().to_string(),
        attachment,
    };

    info!("Sending application email to {} with subject '{subject}'", to.join(", "));
    let delivery = state.mailer.send(&email).await?;

    let (verb, demo_mode) = match delivery {
        Delivery::Sent => ("sent", false),
        Delivery::Prepared => ("prepared", true),
    };
    let mode_indicator = if demo_mode { " (Demo Mode)" } else { "" };

    Ok(Json(SendEmailResponse {
        success: true,
        message: format!("Email {verb} successfully{mode_indicator}!"),
        status: "success".to_string(),
        details: format!(
            "Email {verb} to {} recipient(s) with subject: '{subject}'",
            to.len()
        ),
        to,
        subject,
        demo_mode,
        attachment: attachment_label,
    }))
}
