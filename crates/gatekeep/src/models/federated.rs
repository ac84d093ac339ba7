use super::Account;

/// Identity asserted by an external provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FederatedClaims {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Result of matching federated claims against local accounts
#[derive(Debug, Clone)]
pub enum Reconciled {
    /// An account with this email already existed and was left untouched
    Existing(Account),
    /// No account existed, this one still has to be persisted
    Created(Account),
}
