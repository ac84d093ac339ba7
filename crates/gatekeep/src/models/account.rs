use iso8601_timestamp::Timestamp;

/// How an account proves its identity
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Email and password held by us
    Local,
    /// Authentication delegated to an external identity provider
    Federated,
}

/// What a verification code may be exchanged for
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Activation,
    PasswordReset,
}

/// One-time verification code
///
/// The code and its expiry only ever exist together.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    /// Opaque random code sent to the user
    pub code: String,
    /// Last instant at which the code is still accepted
    pub expiry: Timestamp,
    /// Operation this code was issued for
    pub purpose: CodePurpose,
}

/// Outcome of checking a presented code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Valid,
    Expired,
    Mismatch,
}

/// Account model
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Account {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// User's email
    pub email: String,

    /// Normalised email, unique across accounts
    pub email_normalised: String,

    /// Argon2 hashed password
    ///
    /// Empty for federated accounts.
    pub password: String,

    /// Display name
    pub name: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Avatar URL
    pub image: Option<String>,

    /// Role label
    pub role: String,

    /// Local or federated
    pub account_type: AccountType,

    /// Whether the account has been activated
    pub active: bool,

    /// Pending verification code
    pub verification: Option<VerificationCode>,

    /// Time of creation
    pub created_at: Timestamp,

    /// Time of last modification
    pub updated_at: Timestamp,

    /// Incremented on every successful save
    #[serde(default)]
    pub revision: u64,
}

/// Caller-visible projection of an account
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub account_type: AccountType,
}
