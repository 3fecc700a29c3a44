use crate::domain::ContactForm;

/// A logical contact field and the names the site may submit it under,
/// newest name first
struct ContactField {
    name: &'static str,
    aliases: &'static [&'static str],
}

const NAME: ContactField = ContactField { name: "name", aliases: &["nome"] };
const EMAIL: ContactField = ContactField { name: "email", aliases: &["email", "gmail"] };
const PHONE: ContactField = ContactField { name: "phone", aliases: &["telefone", "numero"] };
const MESSAGE: ContactField = ContactField { name: "message", aliases: &["mensagem", "descricao"] };

impl ContactField {
    /// Value of the first alias that carries a non-empty value
    fn resolve<'a>(&self, form: &'a ContactForm) -> Option<&'a str> {
        self.aliases
            .iter()
            .filter_map(|alias| form.field(alias))
            .find(|value| !value.is_empty())
    }
}

/// A validated contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactRequest {
    /// Resolve every logical field from the submitted form.
    ///
    /// Returns the names of the missing fields if any of them is absent or empty.
    pub fn parse(form: &ContactForm) -> Result<Self, String> {
        let mut missing = Vec::new();
        let mut resolve = |field: &ContactField| match field.resolve(form) {
            Some(value) => value.to_owned(),
            None => {
                missing.push(field.name);
                String::new()
            }
        };

        let request = Self {
            name: resolve(&NAME),
            email: resolve(&EMAIL),
            phone: resolve(&PHONE),
            message: resolve(&MESSAGE),
        };

        if missing.is_empty() {
            Ok(request)
        } else {
            Err(format!("Missing required contact fields: {}", missing.join(", ")))
        }
    }
}

impl TryFrom<ContactForm> for ContactRequest {
    type Error = String;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        Self::parse(&form)
    }
}
