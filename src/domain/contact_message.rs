use chrono::NaiveDateTime;
use crate::domain::ContactRequest;

/// The email composed out of a contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub subject: String,
    pub html: String,
}

impl ContactMessage {
    /// Build the subject line and HTML body for a submission received at `received_at`
    pub fn compose(request: &ContactRequest, received_at: NaiveDateTime) -> Self {
        let subject = format!("Nova mensagem de contato - {}", request.name);

        let name = escape_html(&request.name);
        let email = escape_html(&request.email);
        let phone = escape_html(&request.phone);
        let message = escape_html(&request.message);
        // Brazilian locale, e.g. `09/03/2024, 14:05:00`
        let date = received_at.format("%d/%m/%Y, %H:%M:%S");

        let html = format!(
            r#"
            <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
              <h2 style="color: #D9B84A; border-bottom: 2px solid #D9B84A; padding-bottom: 10px;">
                Nova mensagem do site Salita'a Cosmetic
              </h2>

              <div style="background: #f9f9f9; padding: 20px; border-radius: 8px; margin: 20px 0;">
                <h3 style="color: #333; margin-top: 0;">Informações do contato:</h3>
                <p><strong>Nome:</strong> {name}</p>
                <p><strong>E-mail:</strong> {email}</p>
                <p><strong>Número:</strong> {phone}</p>
              </div>

              <div style="background: #fff; padding: 20px; border: 1px solid #ddd; border-radius: 8px;">
                <h3 style="color: #333; margin-top: 0;">Mensagem:</h3>
                <p style="line-height: 1.6; color: #555;">{message}</p>
              </div>

              <div style="margin-top: 20px; padding: 15px; background: #e8f5e8; border-radius: 8px;">
                <p style="margin: 0; color: #2e7d32; font-size: 14px;">
                  <strong>Data:</strong> {date}
                </p>
              </div>
            </div>
            "#
        );

        Self { subject, html }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
