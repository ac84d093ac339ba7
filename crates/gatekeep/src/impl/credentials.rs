use crate::{
    config::PasswordHashing,
    models::{Account, AccountType},
    Error, Result, Success,
};

/// Salt for the hash computed when there is no stored hash to check
static MISSING_ACCOUNT_SALT: &[u8] = b"gatekeep-missing-account";

impl PasswordHashing {
    fn argon_config(&self) -> argon2::Config<'static> {
        argon2::Config {
            variant: argon2::Variant::Argon2id,
            mem_cost: self.mem_cost,
            time_cost: self.time_cost,
            lanes: self.lanes,
            ..argon2::Config::default()
        }
    }

    /// Hash a password using argon2 with a fresh random salt
    pub fn hash(&self, plaintext_password: &str) -> Result<String> {
        argon2::hash_encoded(
            plaintext_password.as_bytes(),
            nanoid!(24).as_bytes(),
            &self.argon_config(),
        )
        .map_err(|err| {
            error!("Failed to hash password: {:?}", err);
            Error::InternalError
        })
    }

    /// Check a password against an encoded hash
    ///
    /// Malformed or empty hashes never match.
    pub fn verify(&self, plaintext_password: &str, hash: &str) -> bool {
        if hash.is_empty() {
            return false;
        }

        argon2::verify_encoded(hash, plaintext_password.as_bytes()).unwrap_or(false)
    }

    /// Do the work of one `verify` when no account matched
    ///
    /// Keeps a lookup of an unknown email as slow as a wrong password.
    pub fn verify_missing(&self, plaintext_password: &str) {
        if let Err(err) = argon2::hash_raw(
            plaintext_password.as_bytes(),
            MISSING_ACCOUNT_SALT,
            &self.argon_config(),
        ) {
            error!("Failed to hash password: {:?}", err);
        }
    }
}

impl Account {
    /// Verify a user's password is correct
    pub fn verify_password(&self, hashing: &PasswordHashing, plaintext_password: &str) -> Success {
        // Federated accounts have no local credential to check against.
        if self.account_type != AccountType::Local {
            hashing.verify_missing(plaintext_password);
            return Err(Error::InvalidCredentials);
        }

        if hashing.verify(plaintext_password, &self.password) {
            Ok(())
        } else {
            Err(Error::InvalidCredentials)
        }
    }
}
