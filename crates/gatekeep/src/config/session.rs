use crate::models::Secret;

/// Session token configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionConfig {
    /// HMAC key used to sign session tokens
    pub secret: Secret,

    /// How long a session token lasts for (in seconds)
    pub ttl: i64,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            secret: Default::default(),
            ttl: 3600 * 24,
        }
    }
}
