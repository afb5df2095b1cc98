use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{template, Mailer, MailerError, OutboundEmail};

/// Mail-provider API client
/// Renders the template and posts the message to the provider's send endpoint
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        let html = template::render(&email.template, &email.vars)?;

        let payload = json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "html": html,
        });

        let started = Instant::now();
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailerError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                template = %email.template,
                status = %status,
                "mail provider rejected message: {}",
                body
            );
            return Err(MailerError::Provider(format!(
                "provider returned status {}",
                status
            )));
        }

        tracing::debug!(
            template = %email.template,
            duration_ms = started.elapsed().as_millis() as u64,
            "email dispatched"
        );

        Ok(())
    }
}
