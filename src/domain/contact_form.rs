use std::collections::HashMap;
use anyhow::Context;
use serde_json::Value;

/// The raw fields of a contact form submission, keyed by the name the site submitted them under
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactForm(HashMap<String, String>);

/// How the body of a submission is encoded, derived from its `Content-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyEncoding {
    Json,
    UrlEncoded,
    Unsupported,
}

impl BodyEncoding {
    fn from_content_type(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if essence == "application/json"
            || (essence.starts_with("application/") && essence.ends_with("+json"))
        {
            BodyEncoding::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyEncoding::UrlEncoded
        } else {
            BodyEncoding::Unsupported
        }
    }
}

impl ContactForm {
    /// Parse a request body according to its content type.
    ///
    /// JSON objects and url-encoded forms are understood. Any other content type
    /// (or an empty body) yields an empty form, which then fails validation. A body
    /// that claims to be JSON or a form but cannot be decoded is an error.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, anyhow::Error> {
        if body.is_empty() {
            return Ok(Self::default());
        }

        match BodyEncoding::from_content_type(content_type) {
            BodyEncoding::Json => {
                let object: serde_json::Map<String, Value> = serde_json::from_slice(body)
                    .context("Failed to decode the contact form as a JSON object")?;
                let fields = object
                    .into_iter()
                    .filter_map(|(key, value)| json_text(value).map(|text| (key, text)))
                    .collect();
                Ok(Self(fields))
            }
            BodyEncoding::UrlEncoded => {
                let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                    .context("Failed to decode the url-encoded contact form")?;
                // Repeated keys are not collected into a list, the first occurrence is
                // kept since every contact field carries a single value
                let mut fields = HashMap::new();
                for (key, value) in pairs {
                    fields.entry(key).or_insert(value);
                }
                Ok(Self(fields))
            }
            BodyEncoding::Unsupported => Ok(Self::default()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for ContactForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Textual value of a JSON field, `None` for values a form field could not have carried
fn json_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
