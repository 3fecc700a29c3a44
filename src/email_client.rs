use std::fmt::{Display, Formatter};
use std::sync::Arc;
use secrecy::ExposeSecret;

use crate::configuration::EmailClientSettings;

mod resend;
mod smtp;

pub use resend::ResendClient;
pub use smtp::SmtpClient;

/// An email ready to be handed to a transport.
///
/// The sender address is not part of it: every transport sends from its own configured identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// The provider an [`EmailSender`] delivers through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Resend,
    Smtp,
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Resend => write!(f, "resend"),
            Transport::Smtp => write!(f, "smtp"),
        }
    }
}

#[async_trait::async_trait]
pub trait EmailSender: Send + Sync + 'static {
    fn transport(&self) -> Transport;

    /// Deliver `email` with a single attempt
    async fn send_email(&self, email: &Email) -> Result<(), anyhow::Error>;
}

/// Pick the transport for the lifetime of the process.
///
/// Resend is used whenever an API key is configured, regardless of any SMTP credentials.
/// Otherwise the SMTP relay is used; missing credentials only surface when sending.
pub fn select_email_sender(
    settings: &EmailClientSettings,
) -> Result<Arc<dyn EmailSender>, anyhow::Error> {
    if let Some(api_key) = settings.resend_api_key() {
        let client = ResendClient::new(
            settings.resend.base_url.clone(),
            settings.resend.sender.clone(),
            api_key.clone(),
        );
        return Ok(Arc::new(client));
    }

    if settings.smtp.username.is_empty() || settings.smtp.password.expose_secret().is_empty() {
        tracing::warn!("SMTP credentials are not configured, contact emails will fail to send");
    }
    let client = SmtpClient::new(
        &settings.smtp.host,
        settings.smtp.username.clone(),
        settings.smtp.password.clone(),
    )?;
    Ok(Arc::new(client))
}
