use std::collections::HashMap;

/// SMTP mail server configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SMTPSettings {
    /// Sender address
    pub from: String,

    /// Reply-To address
    pub reply_to: Option<String>,

    /// SMTP host
    pub host: String,

    /// SMTP port
    pub port: Option<u16>,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Whether to use TLS
    pub use_tls: Option<bool>,
}

/// Email template
///
/// Both bodies are rendered with Handlebars against the context
/// supplied by the caller, e.g. `{{name}}` and `{{activationCode}}`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Template {
    /// Plain text version of this email
    pub text: String,
    /// HTML version of this email
    pub html: Option<String>,
}

/// Templates keyed by name
pub type Templates = HashMap<String, Template>;
