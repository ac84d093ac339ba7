use crate::{models::Account, Error, Result, Success};

use futures::lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::definition::AbstractDatabase;

#[derive(Default, Clone)]
pub struct DummyDb {
    pub accounts: Arc<Mutex<HashMap<String, Account>>>,
}

fn has_code(account: &Account, code: &str) -> bool {
    account
        .verification
        .as_ref()
        .map(|verification| verification.code == code)
        .unwrap_or(false)
}

#[async_trait]
impl AbstractDatabase for DummyDb {
    /// Find account by id
    async fn find_account(&self, id: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(id).cloned())
    }

    /// Find account by normalised email
    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| account.email_normalised == normalised_email)
            .cloned())
    }

    /// Find account by id with the given pending code
    async fn find_account_by_id_and_code(&self, id: &str, code: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(id)
            .filter(|account| has_code(account, code))
            .cloned())
    }

    /// Find account by normalised email with the given pending code
    async fn find_account_by_email_and_code(
        &self,
        normalised_email: &str,
        code: &str,
    ) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| {
                account.email_normalised == normalised_email && has_code(account, code)
            })
            .cloned())
    }

    /// Insert a new account
    async fn insert_account(&self, account: &Account) -> Success {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .values()
            .any(|existing| existing.email_normalised == account.email_normalised)
        {
            return Err(Error::EmailTaken);
        }

        if accounts.contains_key(&account.id) {
            return Err(Error::DatabaseError {
                operation: "insert",
                with: "account",
            });
        }

        accounts.insert(account.id.to_string(), account.clone());
        Ok(())
    }

    /// Save an existing account
    async fn save_account(&self, account: &Account) -> Result<Account> {
        let mut accounts = self.accounts.lock().await;
        let stored = accounts.get_mut(&account.id).ok_or(Error::DatabaseError {
            operation: "save",
            with: "account",
        })?;

        if stored.revision != account.revision {
            return Err(Error::WriteConflict);
        }

        let mut account = account.clone();
        account.revision += 1;
        *stored = account.clone();

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[async_std::test]
    async fn it_enforces_unique_emails() {
        let db = DummyDb::default();
        db.insert_account(&test_account("grace@example.com"))
            .await
            .unwrap();

        assert_eq!(
            db.insert_account(&test_account("Grace@Example.com")).await,
            Err(Error::EmailTaken)
        );
    }

    #[async_std::test]
    async fn it_rejects_stale_writes() {
        let db = DummyDb::default();
        let account = test_account("heidi@example.com");
        db.insert_account(&account).await.unwrap();

        let mut first = account.clone();
        first.name = Some("First".into());
        let saved = db.save_account(&first).await.unwrap();
        assert_eq!(saved.revision, 1);

        let mut second = account.clone();
        second.name = Some("Second".into());
        assert_eq!(
            db.save_account(&second).await.err(),
            Some(Error::WriteConflict)
        );

        let stored = db.find_account(&account.id).await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("First"));
        assert_eq!(stored.revision, 1);
    }

    #[async_std::test]
    async fn it_matches_pending_codes() {
        let db = DummyDb::default();
        let mut account = test_account("ivan@example.com");
        let code = account
            .issue_code(CodePurpose::Activation, Timestamp::now_utc())
            .code
            .clone();
        db.insert_account(&account).await.unwrap();

        assert!(db
            .find_account_by_id_and_code(&account.id, &code)
            .await
            .unwrap()
            .is_some());
        assert!(db
            .find_account_by_id_and_code(&account.id, "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(db
            .find_account_by_email_and_code("ivan@example.com", &code)
            .await
            .unwrap()
            .is_some());
        assert!(db
            .find_account_by_email_and_code("ivan@example.com", "")
            .await
            .unwrap()
            .is_none());
    }
}
