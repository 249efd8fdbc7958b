//! SMTP delivery over a STARTTLS relay (Gmail by default).
//!
//! One attempt per message. Failures are classified from the SMTP reply code
//! and returned with the server's text so the caller can show it verbatim.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpSettings;
use crate::mail::{build_message, Delivery, MailError, Mailer, OutgoingEmail};

const GMAIL_APP_PASSWORD_LEN: usize = 16;

struct Relay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

pub struct SmtpMailer {
    relay: Option<Relay>,
}

impl SmtpMailer {
    /// Builds the transport when credentials are present. Without them the
    /// mailer still constructs, and every send reports `NotConfigured`.
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let (Some(username), Some(password)) = (&settings.username, &settings.password) else {
            warn!("SMTP credentials missing; /send_email will report not configured");
            return Ok(Self { relay: None });
        };

        check_app_password(password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .with_context(|| format!("Invalid SMTP relay host '{}'", settings.host))?
            .port(settings.port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .timeout(Some(settings.timeout))
            .build();

        info!(
            "SMTP mailer configured for {}:{} as {}",
            settings.host, settings.port, username
        );

        Ok(Self {
            relay: Some(Relay {
                transport,
                sender: username.clone(),
            }),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Delivery, MailError> {
        let relay = self.relay.as_ref().ok_or(MailError::NotConfigured)?;
        let message = build_message(&relay.sender, email)?;

        info!("Sending email to {} recipient(s)", email.to.len());
        match relay.transport.send(message).await {
            Ok(response) => {
                info!("Email accepted by relay: {:?}", response.code());
                Ok(Delivery::Sent)
            }
            Err(e) => {
                let code = e.status().and_then(|c| c.to_string().parse::<u16>().ok());
                let connection_lost = e.is_timeout() || (code.is_none() && !e.is_client() && !e.is_tls());
                Err(classify_failure(code, connection_lost, e.to_string()))
            }
        }
    }
}

/// Maps an SMTP failure to the error taxonomy surfaced to clients.
pub fn classify_failure(code: Option<u16>, connection_lost: bool, detail: String) -> MailError {
    match code {
        Some(530 | 534 | 535) => MailError::AuthFailed(detail),
        Some(550 | 551 | 553) => MailError::RecipientsRefused(detail),
        None if connection_lost => MailError::Disconnected(detail),
        _ => MailError::Other(detail),
    }
}

/// Gmail app passwords are 16 characters with no spaces. Returns what looks
/// wrong; an empty list means the password has the expected shape.
fn app_password_issues(password: &str) -> Vec<String> {
    let mut issues = Vec::new();
    let len = password.chars().count();
    if len != GMAIL_APP_PASSWORD_LEN {
        issues.push(format!(
            "App Password length issue: {len} characters (expected {GMAIL_APP_PASSWORD_LEN})"
        ));
    }
    if password.contains(' ') {
        issues.push("App Password contains spaces".to_string());
    }
    issues
}

/// Only warns; the relay has the final say on credentials.
fn check_app_password(password: &str) {
    for issue in app_password_issues(password) {
        warn!("{issue}");
    }
}
