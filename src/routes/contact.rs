use std::fmt::{Debug, Formatter};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::Local;

use crate::domain::{ContactForm, ContactMessage, ContactRequest};
use crate::email_client::{Email, EmailSender};
use crate::routes::error_chain_fmt;

pub const ALL_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios";
pub const MESSAGE_SENT: &str = "Mensagem enviada com sucesso!";
pub const TRY_AGAIN_LATER: &str = "Erro interno do servidor. Tente novamente mais tarde.";
/// Largest contact form body read into memory
pub const CONTACT_BODY_LIMIT: usize = 256 * 1024;

/// Process-wide settings of the contact endpoint
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub recipient: String,
    /// Pretend failed deliveries succeeded, for demo and staging deployments
    pub demo_mode: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_owned(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to deliver the contact email")]
    DeliveryError(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::DeliveryError(_) | ContactError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // Callers never see the underlying cause, only one of the fixed messages
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ContactError::ValidationError(_) => ALL_FIELDS_REQUIRED,
            ContactError::DeliveryError(_) | ContactError::UnexpectedError(_) => TRY_AGAIN_LATER,
        };
        HttpResponse::build(self.status_code()).json(ContactResponse::new(false, message))
    }
}

#[tracing::instrument(
    name = "Relay a contact form submission",
    skip(request, body, email_sender, settings),
    fields(
        submission_id = %uuid::Uuid::new_v4(),
        contact_name = tracing::field::Empty,
        contact_email = tracing::field::Empty
    )
)]
pub async fn contact(
    request: HttpRequest,
    // Payload errors (e.g. an oversized body) are answered like any other unexpected error
    body: Result<web::Bytes, actix_web::Error>,
    email_sender: web::Data<dyn EmailSender>,
    settings: web::Data<ContactSettings>,
) -> Result<HttpResponse, ContactError> {
    let outcome = match body {
        Ok(body) => relay_contact(&request, &body, email_sender.get_ref(), &settings).await,
        Err(e) => Err(ContactError::UnexpectedError(anyhow::anyhow!(
            "Failed to read the contact form body: {}",
            e
        ))),
    };
    outcome
        .map_err(|e| {
            match &e {
                ContactError::ValidationError(_) => {
                    tracing::info!(error = %e, "Rejected an incomplete contact submission")
                }
                _ => tracing::error!(error.cause_chain = ?e, "Failed to relay a contact submission"),
            }
            e
        })?;

    Ok(HttpResponse::Ok().json(ContactResponse::new(true, MESSAGE_SENT)))
}

async fn relay_contact(
    request: &HttpRequest,
    body: &[u8],
    email_sender: &dyn EmailSender,
    settings: &ContactSettings,
) -> Result<(), ContactError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let form = ContactForm::parse(content_type, body)?;
    let contact = ContactRequest::try_from(form).map_err(ContactError::ValidationError)?;

    let span = tracing::Span::current();
    span.record("contact_name", &tracing::field::display(&contact.name));
    span.record("contact_email", &tracing::field::display(&contact.email));

    let message = ContactMessage::compose(&contact, Local::now().naive_local());
    let email = Email {
        recipient: settings.recipient.clone(),
        reply_to: contact.email.clone(),
        subject: message.subject,
        html: message.html,
    };

    if let Err(e) = email_sender.send_email(&email).await {
        if !settings.demo_mode {
            return Err(ContactError::DeliveryError(e));
        }
        tracing::error!(
            error.cause_chain = ?e,
            transport = %email_sender.transport(),
            "Failed to send the contact email"
        );
        tracing::warn!(
            contact_name = %contact.name,
            contact_email = %contact.email,
            contact_phone = %contact.phone,
            contact_message = %contact.message,
            "Demo mode is enabled, recording the submission and reporting success"
        );
    }
    Ok(())
}
