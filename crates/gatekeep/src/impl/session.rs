use chrono::Utc;

use crate::{
    config::SessionConfig,
    models::{Account, LoginResponse, PublicProfile, Secret, SessionClaims},
    Error, Result,
};

/// Mints and checks signed session tokens
#[derive(Clone, Debug)]
pub struct SessionIssuer {
    secret: Secret,
    ttl: i64,
}

impl SessionIssuer {
    pub fn new(config: &SessionConfig) -> SessionIssuer {
        SessionIssuer {
            secret: config.secret.clone(),
            ttl: config.ttl,
        }
    }

    /// Issue a token for the given account identity
    pub fn issue(&self, account_id: &str, email: &str) -> Result<String> {
        if self.secret.is_empty() {
            error!("Refusing to sign a session token without a signing key");
            return Err(Error::InternalError);
        }

        let iat = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account_id.to_string(),
            username: email.to_string(),
            iat,
            exp: iat + self.ttl,
        };

        self.secret.sign_claims(&claims).map_err(|err| {
            error!("Failed to sign session token: {:?}", err);
            Error::InternalError
        })
    }

    /// Issue a token and pair it with the account's public profile
    pub fn login(&self, account: &Account) -> Result<LoginResponse> {
        Ok(LoginResponse {
            user: account.to_public(),
            access_token: self.issue(&account.id, &account.email)?,
        })
    }

    /// Validate a token presented by a client
    pub fn validate(&self, token: &str) -> Result<SessionClaims> {
        self.secret
            .validate_claims(token)
            .map_err(|_| Error::InvalidSession)
    }
}

impl Account {
    /// Fields of this account that may leave the service
    pub fn to_public(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            account_type: self.account_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    use super::SessionIssuer;

    fn issuer(ttl: i64) -> SessionIssuer {
        SessionIssuer::new(&SessionConfig {
            secret: Secret::new("session signing key"),
            ttl,
        })
    }

    #[test]
    fn it_issues_tokens_bound_to_the_account() {
        let issuer = issuer(3600);
        let token = issuer.issue("01ACCOUNT", "alice@example.com").unwrap();
        let claims = issuer.validate(&token).unwrap();

        assert_eq!(claims.sub, "01ACCOUNT");
        assert_eq!(claims.username, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn it_rejects_expired_tokens() {
        let issuer = issuer(-3600);
        let token = issuer.issue("01ACCOUNT", "alice@example.com").unwrap();

        assert_eq!(issuer.validate(&token), Err(Error::InvalidSession));
    }

    #[test]
    fn it_rejects_tokens_signed_with_another_key() {
        let token = issuer(3600).issue("01ACCOUNT", "alice@example.com").unwrap();
        let other = SessionIssuer::new(&SessionConfig {
            secret: Secret::new("another key"),
            ttl: 3600,
        });

        assert_eq!(other.validate(&token), Err(Error::InvalidSession));
        assert_eq!(other.validate("garbage"), Err(Error::InvalidSession));
    }

    #[test]
    fn it_refuses_to_sign_without_a_key() {
        let issuer = SessionIssuer::new(&SessionConfig::default());

        assert_eq!(
            issuer.issue("01ACCOUNT", "alice@example.com"),
            Err(Error::InternalError)
        );
    }

    #[test]
    fn it_never_exposes_credentials_on_login() {
        let mut account = test_account("alice@example.com");
        account.password = test_hashing().hash("password").unwrap();
        let code = account
            .issue_code(CodePurpose::Activation, Timestamp::now_utc())
            .code
            .clone();

        let response = issuer(3600).login(&account).unwrap();
        let serialised = serde_json::to_string(&response).unwrap();

        assert_eq!(response.user.id, account.id);
        assert_eq!(response.user.email, "alice@example.com");
        assert!(!serialised.contains(&account.password));
        assert!(!serialised.contains(&code));
        assert!(!serialised.contains("password"));
    }
}
