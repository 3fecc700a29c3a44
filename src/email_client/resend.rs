use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::email_client::{Email, EmailSender, Transport};
use crate::email_request::SendEmailRequest;

/// Delivers through the Resend HTTP API
pub struct ResendClient {
    http_client: Client,
    base_url: String,
    sender: String,
    api_key: Secret<String>,
}

impl ResendClient {
    pub fn new(base_url: String, sender: String, api_key: Secret<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            sender,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl EmailSender for ResendClient {
    fn transport(&self) -> Transport {
        Transport::Resend
    }

    #[tracing::instrument(
        name = "Send an email through Resend",
        skip(self, email),
        fields(recipient = %email.recipient)
    )]
    async fn send_email(&self, email: &Email) -> Result<(), anyhow::Error> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));

        let request_body = SendEmailRequest {
            from: &self.sender,
            to: vec![&email.recipient],
            reply_to: &email.reply_to,
            subject: &email.subject,
            html: &email.html,
        };

        self.http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .context("Failed to reach the Resend API")?
            // A 4xx/5xx from Resend is a failed delivery as well
            .error_for_status()
            .context("Resend rejected the email")?;

        Ok(())
    }
}
