pub use std::{sync::Arc, time::Duration};

pub use async_std::channel::unbounded;
pub use iso8601_timestamp::Timestamp;
pub use serde_json::Value;

pub use crate::{
    config::*,
    database::{definition::AbstractDatabase, Database, DummyDb},
    events::GatekeepEvent,
    mail::{MailDispatcher, Mailer},
    models::*,
    r#impl::{FederatedTokenVerifier, IdToken, CODE_LIFETIME},
    Error, Gatekeep, Result, Success,
};

use std::collections::HashMap;

use async_std::channel::{Receiver, Sender};

pub const TEST_AUDIENCE: &str = "test-client.apps.googleusercontent.com";

/// Cheap argon2 parameters so tests stay fast
pub fn test_hashing() -> PasswordHashing {
    PasswordHashing {
        mem_cost: 256,
        time_cost: 1,
        lanes: 1,
    }
}

pub fn test_config() -> Config {
    Config {
        session: SessionConfig {
            secret: Secret::new("test signing key"),
            ttl: 3600,
        },
        passwords: test_hashing(),
        federation: FederationConfig {
            audience: TEST_AUDIENCE.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Unsaved inactive local account without a password
pub fn test_account(email: &str) -> Account {
    Account::new_local(
        email.into(),
        String::new(),
        None,
        "USERS".into(),
        Timestamp::now_utc(),
    )
}

/// Verifier that accepts a fixed set of tokens issued for `TEST_AUDIENCE`
#[derive(Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, Value>,
}

impl StaticVerifier {
    pub fn with_token(mut self, token: &str, claims: Value) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }
}

#[async_trait]
impl FederatedTokenVerifier for StaticVerifier {
    async fn verify_id_token(&self, id_token: &str, audience: &str) -> Result<IdToken> {
        if audience != TEST_AUDIENCE {
            return Err(Error::InvalidToken);
        }

        match self.tokens.get(id_token) {
            Some(Value::Object(claims)) => Ok(claims.clone().into_iter().collect()),
            _ => Err(Error::InvalidToken),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub context: Value,
}

/// Mailer that hands every email it was asked to send back to the test
///
/// Delivery runs on a spawned task, so tests wait for mail with `next_mail`.
pub struct RecordingMailer {
    outbox: Sender<SentMail>,
    inbox: Receiver<SentMail>,
    delay: Option<Duration>,
    fail: bool,
}

impl Default for RecordingMailer {
    fn default() -> Self {
        let (outbox, inbox) = unbounded();
        RecordingMailer {
            outbox,
            inbox,
            delay: None,
            fail: false,
        }
    }
}

impl RecordingMailer {
    pub fn failing() -> Self {
        RecordingMailer {
            fail: true,
            ..Default::default()
        }
    }

    /// Takes `delay` to deliver every email
    pub fn slow(delay: Duration) -> Self {
        RecordingMailer {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// Wait for the next email, failing the test if none arrives
    pub async fn next_mail(&self) -> SentMail {
        async_std::future::timeout(Duration::from_secs(10), self.inbox.recv())
            .await
            .expect("an email within 10 seconds")
            .expect("mailer still open")
    }

    /// Wait for the next email and return the code it carries
    pub async fn next_code(&self) -> String {
        self.next_mail().await.context["activationCode"]
            .as_str()
            .expect("an email with a code")
            .to_string()
    }

    /// Number of emails delivered but not yet taken
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

#[async_trait]
impl MailDispatcher for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, template: &str, context: Value) -> Success {
        if let Some(delay) = self.delay {
            async_std::task::sleep(delay).await;
        }

        self.outbox
            .send(SentMail {
                to: to.into(),
                subject: subject.into(),
                template: template.into(),
                context,
            })
            .await
            .expect("inbox still open");

        if self.fail {
            Err(Error::EmailFailed)
        } else {
            Ok(())
        }
    }
}

/// Repository that yields to other tasks after every email lookup
///
/// Lets two operations on the same account both read it before either saves.
#[derive(Default)]
pub struct YieldingDb {
    inner: DummyDb,
}

#[async_trait]
impl AbstractDatabase for YieldingDb {
    async fn find_account(&self, id: &str) -> Result<Option<Account>> {
        self.inner.find_account(id).await
    }

    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>> {
        let account = self
            .inner
            .find_account_by_normalised_email(normalised_email)
            .await;
        async_std::task::yield_now().await;
        account
    }

    async fn find_account_by_id_and_code(&self, id: &str, code: &str) -> Result<Option<Account>> {
        self.inner.find_account_by_id_and_code(id, code).await
    }

    async fn find_account_by_email_and_code(
        &self,
        normalised_email: &str,
        code: &str,
    ) -> Result<Option<Account>> {
        self.inner
            .find_account_by_email_and_code(normalised_email, code)
            .await
    }

    async fn insert_account(&self, account: &Account) -> Success {
        self.inner.insert_account(account).await
    }

    async fn save_account(&self, account: &Account) -> Result<Account> {
        self.inner.save_account(account).await
    }
}

pub fn build(
    config: Config,
    database: Database,
    mailer: RecordingMailer,
    verifier: StaticVerifier,
) -> (Gatekeep, Arc<RecordingMailer>) {
    let mailer = Arc::new(mailer);
    let gatekeep = Gatekeep::new(
        config,
        database,
        Mailer::Custom(mailer.clone()),
        Arc::new(verifier),
    );

    (gatekeep, mailer)
}

pub fn for_test_with(
    mailer: RecordingMailer,
    verifier: StaticVerifier,
) -> (Gatekeep, Arc<RecordingMailer>) {
    build(test_config(), Default::default(), mailer, verifier)
}

pub fn for_test() -> (Gatekeep, Arc<RecordingMailer>) {
    for_test_with(Default::default(), Default::default())
}

/// Move an account's pending code expiry by `offset_ms` relative to now
pub async fn shift_code_expiry(gatekeep: &Gatekeep, id: &str, offset_ms: i64) {
    let mut account = gatekeep
        .database
        .find_account(id)
        .await
        .unwrap()
        .expect("account");

    let verification = account.verification.as_mut().expect("pending code");
    verification.expiry =
        Timestamp::from_unix_timestamp_ms(Timestamp::now_utc().to_unix_timestamp_ms() + offset_ms);

    gatekeep.database.save_account(&account).await.unwrap();
}
