mod contact_form;
mod contact_message;
mod contact_request;

pub use contact_form::ContactForm;
pub use contact_message::ContactMessage;
pub use contact_request::ContactRequest;
