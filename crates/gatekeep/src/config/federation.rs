/// Federated identity provider configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FederationConfig {
    /// Expected `aud` claim, the OAuth client id issued by the provider
    pub audience: String,

    /// Accepted `iss` claims
    pub issuers: Vec<String>,

    /// Where the provider publishes its signing keys
    pub jwks_uri: String,
}

impl Default for FederationConfig {
    fn default() -> FederationConfig {
        FederationConfig {
            audience: String::new(),
            issuers: vec![
                "accounts.google.com".to_string(),
                "https://accounts.google.com".to_string(),
            ],
            jwks_uri: "https://www.googleapis.com/oauth2/v3/certs".to_string(),
        }
    }
}
