use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_std::sync::RwLock;
use iso8601_timestamp::Timestamp;
use jsonwebtoken::{
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};

use crate::{
    config::FederationConfig,
    models::{Account, FederatedClaims, Reconciled},
    util::normalise_email,
    Database, Error, Result,
};

/// Claims of a verified ID token
pub type IdToken = HashMap<String, serde_json::Value>;

/// Checks signature, issuer, audience and expiry of provider-issued ID tokens
#[async_trait]
pub trait FederatedTokenVerifier: Send + Sync {
    /// Verify an ID token and return its claims
    ///
    /// Fails with `RequestFailed` if the provider could not be reached,
    /// any other error means the token itself is unacceptable.
    async fn verify_id_token(&self, id_token: &str, audience: &str) -> Result<IdToken>;
}

/// Minimum time between two fetches of the provider key set
pub const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Last fetched key set
#[derive(Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<Jwk> {
        self.keys.as_ref().and_then(|keys| keys.find(kid)).cloned()
    }

    fn is_fresh(&self) -> bool {
        self.fetched_at
            .map(|fetched_at| fetched_at.elapsed() < KEY_REFRESH_INTERVAL)
            .unwrap_or(false)
    }
}

/// Verifier backed by the provider's published JSON Web Key Set
pub struct JwksVerifier {
    http_client: reqwest::Client,
    jwks_uri: String,
    issuers: Vec<String>,
    keys: RwLock<KeyCache>,
}

impl JwksVerifier {
    pub fn new(config: &FederationConfig) -> JwksVerifier {
        JwksVerifier {
            http_client: reqwest::Client::new(),
            jwks_uri: config.jwks_uri.clone(),
            issuers: config.issuers.clone(),
            keys: RwLock::new(KeyCache::default()),
        }
    }

    /// Fetch the current key set from the provider
    async fn fetch(&self) -> Result<JwkSet> {
        let response = self
            .http_client
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|err| {
                warn!("Failed to fetch provider keys: {:?}", err);
                Error::RequestFailed
            })?;

        response.json().await.map_err(|err| {
            warn!("Provider returned an unreadable key set: {:?}", err);
            Error::RequestFailed
        })
    }

    /// Resolve a key by id
    ///
    /// An unknown id refreshes the cached set, at most once per
    /// `KEY_REFRESH_INTERVAL`.
    async fn find_key(&self, kid: &str) -> Result<DecodingKey> {
        let cached = self.keys.read().await.find(kid);
        if let Some(jwk) = cached {
            return DecodingKey::from_jwk(&jwk).map_err(|_| Error::InvalidToken);
        }

        let mut cache = self.keys.write().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(jwk) = cache.find(kid) {
            return DecodingKey::from_jwk(&jwk).map_err(|_| Error::InvalidToken);
        }

        if cache.is_fresh() {
            debug!("Unknown key id {}, key set was refreshed recently", kid);
            return Err(Error::InvalidToken);
        }

        cache.keys = Some(self.fetch().await?);
        cache.fetched_at = Some(Instant::now());

        let jwk = cache.find(kid).ok_or(Error::InvalidToken)?;
        DecodingKey::from_jwk(&jwk).map_err(|_| Error::InvalidToken)
    }
}

#[async_trait]
impl FederatedTokenVerifier for JwksVerifier {
    async fn verify_id_token(&self, id_token: &str, audience: &str) -> Result<IdToken> {
        let header = jsonwebtoken::decode_header(id_token).map_err(|_| Error::InvalidToken)?;
        if header.alg != Algorithm::RS256 {
            return Err(Error::InvalidToken);
        }

        let kid = header.kid.ok_or(Error::InvalidToken)?;
        let key = self.find_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(self.issuers.as_slice());

        jsonwebtoken::decode::<IdToken>(id_token, &key, &validation)
            .map(|token| token.claims)
            .map_err(|err| {
                debug!("Rejected ID token: {:?}", err);
                Error::InvalidToken
            })
    }
}

/// Turns provider ID tokens into local accounts
#[derive(Clone)]
pub struct FederatedIdentityResolver {
    verifier: Arc<dyn FederatedTokenVerifier>,
    audience: String,
}

impl FederatedIdentityResolver {
    pub fn new(verifier: Arc<dyn FederatedTokenVerifier>, audience: String) -> Self {
        FederatedIdentityResolver { verifier, audience }
    }

    /// Verify an ID token and extract the identity it asserts
    pub async fn verify(&self, id_token: &str) -> Result<FederatedClaims> {
        let id_token = match self.verifier.verify_id_token(id_token, &self.audience).await {
            Ok(id_token) => id_token,
            Err(Error::RequestFailed) => return Err(Error::RequestFailed),
            Err(err) => {
                debug!("Federated token failed verification: {:?}", err);
                return Err(Error::InvalidFederatedToken);
            }
        };

        claims_from_id_token(&id_token).ok_or(Error::InvalidFederatedToken)
    }

    /// Find the local account for a federated identity, or prepare a new one
    ///
    /// Existing accounts are returned untouched, whatever their type.
    pub async fn reconcile(
        &self,
        database: &Database,
        claims: FederatedClaims,
        role: &str,
    ) -> Result<Reconciled> {
        let email_normalised = normalise_email(&claims.email);

        if let Some(account) = database
            .find_account_by_normalised_email(&email_normalised)
            .await?
        {
            Ok(Reconciled::Existing(account))
        } else {
            Ok(Reconciled::Created(Account::new_federated(
                claims,
                role.to_string(),
                Timestamp::now_utc(),
            )))
        }
    }
}

/// Pull the identity out of verified claims
///
/// Tokens without an email, or whose email the provider has not verified,
/// are refused.
fn claims_from_id_token(id_token: &IdToken) -> Option<FederatedClaims> {
    let email = id_token
        .get("email")
        .and_then(|value| value.as_str())
        .filter(|email| !email.trim().is_empty())?;

    let verified = match id_token.get("email_verified") {
        Some(serde_json::Value::Bool(verified)) => *verified,
        Some(serde_json::Value::String(verified)) => verified == "true",
        _ => false,
    };

    if !verified {
        return None;
    }

    let text = |key: &str| {
        id_token
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::to_string)
    };

    Some(FederatedClaims {
        email: email.to_string(),
        name: text("name"),
        picture: text("picture"),
    })
}
