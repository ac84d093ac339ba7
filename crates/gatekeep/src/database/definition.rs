use crate::{models::Account, Result, Success};

/// Account repository
///
/// Implementations must make `insert_account` and `save_account` atomic with
/// respect to each other: uniqueness of the normalised email and the revision
/// check are decided under the same lock or transaction as the write.
#[async_trait]
pub trait AbstractDatabase: Send + Sync {
    /// Find account by id
    async fn find_account(&self, id: &str) -> Result<Option<Account>>;

    /// Find account by normalised email
    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>>;

    /// Find account by id with the given pending code
    async fn find_account_by_id_and_code(&self, id: &str, code: &str) -> Result<Option<Account>>;

    /// Find account by normalised email with the given pending code
    async fn find_account_by_email_and_code(
        &self,
        normalised_email: &str,
        code: &str,
    ) -> Result<Option<Account>>;

    /// Insert a new account
    ///
    /// Fails with `EmailTaken` if the normalised email is already in use.
    async fn insert_account(&self, account: &Account) -> Success;

    /// Save an existing account
    ///
    /// Only succeeds if the stored revision still equals `account.revision`,
    /// otherwise fails with `WriteConflict` and writes nothing.
    /// Returns the account as stored, with its revision incremented.
    async fn save_account(&self, account: &Account) -> Result<Account>;
}
