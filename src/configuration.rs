use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    // Environment variables are always strings, `serde-aux` takes care of the conversion
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Report failed deliveries as successful and only log the submission
    #[serde(default)]
    pub demo_mode: bool,
    pub static_dir: String,
    pub favicon: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    /// Where contact messages are delivered, falls back to the SMTP account
    pub recipient: Option<String>,
    pub resend: ResendSettings,
    pub smtp: SmtpSettings,
}

/// Primary transport, only enabled when an API key is configured
#[derive(serde::Deserialize, Clone)]
pub struct ResendSettings {
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub sender: String,
}

/// Fallback transport, an authenticated SMTP relay
#[derive(serde::Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "empty_secret")]
    pub password: Secret<String>,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

impl EmailClientSettings {
    /// The API key of the primary transport, if one is actually set
    pub fn resend_api_key(&self) -> Option<&Secret<String>> {
        self.resend
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
    }

    pub fn recipient(&self) -> String {
        match &self.recipient {
            Some(recipient) if !recipient.is_empty() => recipient.clone(),
            _ => self.smtp.username.clone(),
        }
    }
}

/// The runtime environment of the application
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Plain environment variable names used by existing deployments,
/// applied on top of every other configuration source
const DEPLOYMENT_VARIABLES: [(&str, &str); 7] = [
    ("PORT", "application.port"),
    ("DEMO_MODE", "application.demo_mode"),
    ("RESEND_API_KEY", "email_client.resend.api_key"),
    ("RESEND_FROM", "email_client.resend.sender"),
    ("GMAIL_USER", "email_client.smtp.username"),
    ("GMAIL_APP_PASSWORD", "email_client.smtp.password"),
    ("RECIPIENT_EMAIL", "email_client.recipient"),
];

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Shared defaults first
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;

    // Detect the running environment, default to `local` if unspecified
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;

    // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    apply_deployment_variables(&mut settings, |name| std::env::var(name).ok())?;

    // Try to convert the configuration values it read into our "Settings" type
    settings.try_into()
}

/// Copy every non-empty deployment variable onto its configuration key
fn apply_deployment_variables<F>(
    settings: &mut config::Config,
    lookup: F,
) -> Result<(), config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for &(variable, key) in DEPLOYMENT_VARIABLES.iter() {
        let value = match lookup(variable).filter(|value| !value.is_empty()) {
            Some(value) => value,
            None => continue,
        };
        if variable == "DEMO_MODE" {
            // Only a literal `true` (any case) enables demo mode, everything else disables it
            settings.set(key, value.eq_ignore_ascii_case("true"))?;
        } else {
            settings.set(key, value)?;
        }
    }
    Ok(())
}
