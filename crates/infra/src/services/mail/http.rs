use super::IMailSender;
use reqwest::Client;
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

/// Sends mails through a transactional mail http api
pub struct HttpMailSender {
    client: Client,
    api_url: Url,
    api_token: Option<String>,
    sender: String,
}

impl HttpMailSender {
    pub fn new(api_url: Url, api_token: Option<String>, sender: String) -> Self {
        Self::with_client(Client::new(), api_url, api_token, sender)
    }

    pub fn with_client(
        client: Client,
        api_url: Url,
        api_token: Option<String>,
        sender: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_token,
            sender,
        }
    }
}

#[async_trait::async_trait]
impl IMailSender for HttpMailSender {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let request = SendMailRequest {
            from: &self.sender,
            to: recipient,
            subject,
            text_body: body,
        };
        let mut builder = self.client.post(self.api_url.clone()).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder.send().await?.error_for_status()?;
        Ok(())
    }
}
