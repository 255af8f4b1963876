use super::IMailSender;
use std::sync::{Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Mail sender that only logs the mails it was asked to send. Used when no
/// mail api is configured. Created with `recording` it also remembers them.
pub struct InMemoryMailSender {
    sent: Option<Mutex<Vec<SentMail>>>,
}

impl InMemoryMailSender {
    pub fn new() -> Self {
        Self { sent: None }
    }

    pub fn recording() -> Self {
        Self {
            sent: Some(Mutex::new(Vec::new())),
        }
    }

    /// Mails sent so far, always empty unless created with `recording`
    pub fn sent(&self) -> Vec<SentMail> {
        match &self.sent {
            Some(sent) => sent.lock().unwrap_or_else(PoisonError::into_inner).clone(),
            None => Vec::new(),
        }
    }
}

impl Default for InMemoryMailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailSender for InMemoryMailSender {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        info!("Mail to {}: [{}] {}", recipient, subject, body);
        if let Some(sent) = &self.sent {
            sent.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SentMail {
                    recipient: recipient.into(),
                    subject: subject.into(),
                    body: body.into(),
                });
        }
        Ok(())
    }
}
