mod email;
mod federation;
mod passwords;
mod session;

pub use email::*;
pub use federation::*;
pub use passwords::*;
pub use session::*;

use std::env;

use crate::{models::Secret, Error, Result};

/// Gatekeep configuration
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    /// Session token signing
    pub session: SessionConfig,

    /// Password hashing cost
    pub passwords: PasswordHashing,

    /// Federated identity provider
    pub federation: FederationConfig,

    /// Role label given to newly created accounts
    #[serde(default = "default_role")]
    pub default_role: String,
}

pub fn default_role() -> String {
    "USERS".to_string()
}

impl Default for Config {
    fn default() -> Config {
        Config {
            session: Default::default(),
            passwords: Default::default(),
            federation: Default::default(),
            default_role: default_role(),
        }
    }
}

impl Config {
    /// Build configuration from process environment
    ///
    /// `JWT_SECRET` and `GOOGLE_CLIENT_ID` are required, everything else
    /// falls back to its default.
    pub fn from_env() -> Result<Config> {
        let secret = required("JWT_SECRET")?;
        let audience = required("GOOGLE_CLIENT_ID")?;

        let mut session = SessionConfig {
            secret: Secret::new(secret),
            ..Default::default()
        };

        if let Some(ttl) = optional("JWT_ACCESS_TOKEN_EXPIRED") {
            session.ttl = parse_ttl(&ttl).ok_or(Error::IncorrectData {
                with: "JWT_ACCESS_TOKEN_EXPIRED",
            })?;
        }

        let mut passwords = PasswordHashing::default();
        if let Some(memory) = optional("PASSWORD_HASH_MEMORY_KIB") {
            passwords.mem_cost = memory.parse().map_err(|_| Error::IncorrectData {
                with: "PASSWORD_HASH_MEMORY_KIB",
            })?;
        }

        if let Some(iterations) = optional("PASSWORD_HASH_ITERATIONS") {
            passwords.time_cost = iterations.parse().map_err(|_| Error::IncorrectData {
                with: "PASSWORD_HASH_ITERATIONS",
            })?;
        }

        Ok(Config {
            session,
            passwords,
            federation: FederationConfig {
                audience,
                ..Default::default()
            },
            default_role: default_role(),
        })
    }
}

fn required(key: &'static str) -> Result<String> {
    optional(key).ok_or(Error::IncorrectData { with: key })
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a token lifetime such as `3600`, `90s`, `15m`, `12h` or `1d` into seconds
pub fn parse_ttl(value: &str) -> Option<i64> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((index, _)) => value.split_at(index),
        None => (value, ""),
    };

    let amount: i64 = digits.parse().ok()?;
    let multiplier = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => return None,
    };

    amount.checked_mul(multiplier).filter(|ttl| *ttl > 0)
}

#[cfg(test)]
mod tests {
    use super::{parse_ttl, Config};
    use crate::Error;

    #[test]
    fn it_parses_token_lifetimes() {
        assert_eq!(parse_ttl("3600"), Some(3600));
        assert_eq!(parse_ttl("90s"), Some(90));
        assert_eq!(parse_ttl("15m"), Some(900));
        assert_eq!(parse_ttl("12h"), Some(43200));
        assert_eq!(parse_ttl(" 1d "), Some(86400));
        assert_eq!(parse_ttl("0"), None);
        assert_eq!(parse_ttl("1w"), None);
        assert_eq!(parse_ttl("d"), None);
    }

    #[test]
    fn it_loads_from_env() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("very secret")),
                ("GOOGLE_CLIENT_ID", Some("client.apps.googleusercontent.com")),
                ("JWT_ACCESS_TOKEN_EXPIRED", Some("2h")),
                ("PASSWORD_HASH_MEMORY_KIB", Some("4096")),
                ("PASSWORD_HASH_ITERATIONS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.session.secret.expose(), "very secret");
                assert_eq!(config.session.ttl, 7200);
                assert_eq!(
                    config.federation.audience,
                    "client.apps.googleusercontent.com"
                );
                assert_eq!(config.passwords.mem_cost, 4096);
                assert_eq!(config.default_role, "USERS");
            },
        );
    }

    #[test]
    fn it_requires_a_signing_key() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", None::<&str>),
                ("GOOGLE_CLIENT_ID", Some("client")),
            ],
            || {
                assert_eq!(
                    Config::from_env().err(),
                    Some(Error::IncorrectData { with: "JWT_SECRET" })
                );
            },
        );
    }

    #[test]
    fn it_rejects_malformed_lifetimes() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("secret")),
                ("GOOGLE_CLIENT_ID", Some("client")),
                ("JWT_ACCESS_TOKEN_EXPIRED", Some("soon")),
            ],
            || {
                assert_eq!(
                    Config::from_env().err(),
                    Some(Error::IncorrectData {
                        with: "JWT_ACCESS_TOKEN_EXPIRED"
                    })
                );
            },
        );
    }
}
