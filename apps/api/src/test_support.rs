//! Fakes injected through `AppState` in unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::llm_client::{LlmError, TextGenerator};
use crate::mail::{Delivery, MailError, Mailer, OutgoingEmail};
use crate::state::AppState;

/// What the scripted generator answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    NotConfigured,
    Api(u16, String),
    Empty,
}

/// Returns a fixed reply and records every prompt it receives.
pub struct ScriptedGenerator {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::NotConfigured => Err(LlmError::NotConfigured),
            Reply::Api(status, message) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
            Reply::Empty => Err(LlmError::EmptyContent),
        }
    }
}

/// Records outgoing mail and answers with a scripted result.
pub struct RecordingMailer {
    outcome: fn() -> Result<Delivery, MailError>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn new(outcome: fn() -> Result<Delivery, MailError>) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn delivering() -> Self {
        Self::new(|| Ok(Delivery::Sent))
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Delivery, MailError> {
        self.sent.lock().unwrap().push(email.clone());
        (self.outcome)()
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

pub fn test_state(llm: Arc<ScriptedGenerator>, mailer: Arc<RecordingMailer>) -> AppState {
    AppState {
        llm,
        mailer,
        config: test_config(),
    }
}
