//! Outgoing application mail.
//!
//! Handlers depend on the `Mailer` trait. `SmtpMailer` talks to the relay;
//! `DryRunMailer` builds and validates the message without connecting.

pub mod handlers;
pub mod smtp;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use thiserror::Error;
use tracing::info;

pub use smtp::SmtpMailer;

/// File name every resume attachment is sent under.
pub const ATTACHMENT_NAME: &str = "Resume.pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Option<MailAttachment>,
}

/// What happened to a message that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Built but not transmitted (dry run).
    Prepared,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Gmail credentials not configured. Please add GMAIL_USER and GMAIL_APP_PASSWORD to .env file.")]
    NotConfigured,

    #[error("At least one recipient email address is required")]
    NoRecipients,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email message: {0}")]
    Build(String),

    #[error(
        "Gmail authentication failed. Please check your credentials and follow these steps:\n\
         1. Enable 2-factor authentication on your Google account\n\
         2. Generate an App Password: https://myaccount.google.com/apppasswords\n\
         3. Use the 16-character App Password (not your regular password)\n\
         4. Update GMAIL_USER and GMAIL_APP_PASSWORD in .env file\n\
         Error details: Authentication failed: {0}"
    )]
    AuthFailed(String),

    #[error("Email recipients refused the message: Recipients refused: {0}")]
    RecipientsRefused(String),

    #[error("Email server disconnected: Server disconnected: {0}")]
    Disconnected(String),

    #[error("Failed to send email: Unexpected error: {0}")]
    Other(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<Delivery, MailError>;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Builds the multipart/mixed message: plain-text body plus optional attachment.
pub fn build_message(from: &str, email: &OutgoingEmail) -> Result<Message, MailError> {
    if email.to.is_empty() {
        return Err(MailError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(from)?)
        .subject(email.subject.trim());
    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body.trim().to_string()));
    if let Some(attachment) = &email.attachment {
        let content_type = ContentType::parse("application/octet-stream")
            .map_err(|e| MailError::Build(e.to_string()))?;
        parts = parts.singlepart(
            Attachment::new(attachment.file_name.clone()).body(attachment.bytes.clone(), content_type),
        );
    }

    builder
        .multipart(parts)
        .map_err(|e| MailError::Build(e.to_string()))
}

/// Validates and builds the message but never connects to a relay.
pub struct DryRunMailer {
    from: String,
}

impl DryRunMailer {
    pub fn new(from: Option<String>) -> Self {
        Self {
            from: from.unwrap_or_else(|| "demo@example.com".to_string()),
        }
    }
}

#[async_trait]
impl Mailer for DryRunMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Delivery, MailError> {
        let message = build_message(&self.from, email)?;
        info!(
            "Dry run: prepared email to {} recipient(s), {} bytes",
            email.to.len(),
            message.formatted().len()
        );
        Ok(Delivery::Prepared)
    }
}
