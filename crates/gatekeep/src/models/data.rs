/// # Registration Data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataRegister {
    /// Email
    pub email: String,
    /// Password
    pub password: String,
    /// Display name
    pub name: Option<String>,
}

/// # Activation Data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataCheckCode {
    /// Account id returned on registration
    pub id: String,
    /// Code received by email
    pub code: String,
}

/// # Password Change Data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataChangePassword {
    /// Email
    pub email: String,
    /// Code received by email
    pub code: String,
    /// New password
    pub password: String,
}

/// # Login Data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataLogin {
    /// Email
    pub email: String,
    /// Password
    pub password: String,
}

/// # Federated Login Data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataLoginFederated {
    /// ID token issued by the identity provider
    pub id_token: String,
}

/// # Account Creation Data
///
/// Used by administrators, no activation email is sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataCreateAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

/// # Profile Data
///
/// Fields left as `None` are not changed.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct DataUpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}
