use iso8601_timestamp::Timestamp;

use crate::{
    models::{Account, AccountType, DataUpdateProfile, FederatedClaims},
    util::normalise_email,
};

impl Account {
    /// Create a new inactive account holding a local password hash
    pub fn new_local(
        email: String,
        password: String,
        name: Option<String>,
        role: String,
        now: Timestamp,
    ) -> Account {
        Account {
            id: ulid::Ulid::new().to_string(),
            email_normalised: normalise_email(&email),
            email,
            password,
            name,
            phone: None,
            address: None,
            image: None,
            role,
            account_type: AccountType::Local,
            active: false,
            verification: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Create a new active account for an externally verified identity
    pub fn new_federated(claims: FederatedClaims, role: String, now: Timestamp) -> Account {
        Account {
            id: ulid::Ulid::new().to_string(),
            email_normalised: normalise_email(&claims.email),
            email: claims.email,
            password: String::new(),
            name: claims.name,
            phone: None,
            address: None,
            image: claims.picture,
            role,
            account_type: AccountType::Federated,
            active: true,
            verification: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Apply profile changes, keeping fields that were not supplied
    pub fn apply_profile(&mut self, data: DataUpdateProfile) {
        if let Some(name) = data.name {
            self.name = Some(name);
        }

        if let Some(phone) = data.phone {
            self.phone = Some(phone);
        }

        if let Some(address) = data.address {
            self.address = Some(address);
        }

        if let Some(image) = data.image {
            self.image = Some(image);
        }
    }

    /// Mark as modified
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
