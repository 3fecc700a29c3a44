use anyhow::Context;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret};

use crate::email_client::{Email, EmailSender, Transport};

/// Delivers through an authenticated SMTP relay over implicit TLS, sending as the account itself
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpClient {
    pub fn new(host: &str, username: String, password: Secret<String>) -> Result<Self, anyhow::Error> {
        let credentials = Credentials::new(username.clone(), password.expose_secret().to_owned());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .with_context(|| format!("Failed to configure the SMTP relay {}", host))?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            sender: username,
        })
    }

    fn build_message(&self, email: &Email) -> Result<Message, anyhow::Error> {
        let message = Message::builder()
            .from(self.sender.parse::<Mailbox>().context("Invalid SMTP sender address")?)
            .to(email.recipient.parse::<Mailbox>().context("Invalid recipient address")?)
            .reply_to(email.reply_to.parse::<Mailbox>().context("Invalid reply-to address")?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .context("Failed to build the email message")?;
        Ok(message)
    }
}

#[async_trait::async_trait]
impl EmailSender for SmtpClient {
    fn transport(&self) -> Transport {
        Transport::Smtp
    }

    #[tracing::instrument(
        name = "Send an email through SMTP",
        skip(self, email),
        fields(recipient = %email.recipient)
    )]
    async fn send_email(&self, email: &Email) -> Result<(), anyhow::Error> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .context("The SMTP relay failed to accept the email")?;
        Ok(())
    }
}
