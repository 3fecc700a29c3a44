/// Body of a `POST /emails` call against the Resend API
#[derive(serde::Serialize)]
pub struct SendEmailRequest<'a> {
    pub from: &'a str,
    pub to: Vec<&'a str>,
    pub reply_to: &'a str,
    pub subject: &'a str,
    pub html: &'a str,
}
