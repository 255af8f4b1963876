mod http;
mod inmemory;

pub use http::HttpMailSender;
pub use inmemory::{InMemoryMailSender, SentMail};

/// Delivers a single message to a single recipient
#[async_trait::async_trait]
pub trait IMailSender: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}
