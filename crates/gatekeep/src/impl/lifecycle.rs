use iso8601_timestamp::Timestamp;

use crate::{
    models::{
        Account, AccountType, CodeCheck, CodePurpose, DataChangePassword, DataCheckCode,
        DataCreateAccount, DataLogin, DataLoginFederated, DataRegister, DataUpdateProfile,
        LoginResponse, PublicProfile, Reconciled,
    },
    util::normalise_email,
    Error, Gatekeep, GatekeepEvent, Result,
};

/// Template used for both activation and password reset emails
pub static CODE_TEMPLATE: &str = "register";

pub static ACTIVATION_SUBJECT: &str = "Activate your account";

pub static RESET_SUBJECT: &str = "Change your account";

impl Gatekeep {
    /// Register a new local account and send its activation code
    pub async fn register(&self, data: DataRegister) -> Result<PublicProfile> {
        let email_normalised = normalise_email(&data.email);
        if self
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?
            .is_some()
        {
            return Err(Error::EmailTaken);
        }

        let password = self.config.passwords.hash(&data.password)?;

        let now = Timestamp::now_utc();
        let mut account = Account::new_local(
            data.email,
            password,
            data.name,
            self.config.default_role.clone(),
            now,
        );

        account.issue_code(CodePurpose::Activation, now);

        // Uniqueness is decided again by the store, a concurrent
        // registration may have won since the lookup above.
        self.database.insert_account(&account).await?;
        info!("Registered account {}", account.id);

        self.publish_event(GatekeepEvent::CreateAccount {
            account_id: account.id.clone(),
            email: account.email.clone(),
            account_type: account.account_type,
        })
        .await;

        self.send_code(&account, ACTIVATION_SUBJECT);
        Ok(account.to_public())
    }

    /// Activate an account using the code sent on registration
    pub async fn check_activation_code(&self, data: DataCheckCode) -> Result<PublicProfile> {
        let mut account = self
            .database
            .find_account_by_id_and_code(&data.id, &data.code)
            .await?
            .ok_or(Error::NotFoundOrBadCode)?;

        let now = Timestamp::now_utc();
        match account.check_code(CodePurpose::Activation, &data.code, now) {
            CodeCheck::Valid => {}
            CodeCheck::Expired => return Err(Error::CodeExpired),
            CodeCheck::Mismatch => return Err(Error::NotFoundOrBadCode),
        }

        account.active = true;
        account.consume_code();
        account.touch(now);

        let account = self.database.save_account(&account).await?;
        info!("Activated account {}", account.id);

        self.publish_event(GatekeepEvent::ActivateAccount {
            account_id: account.id.clone(),
        })
        .await;

        Ok(account.to_public())
    }

    /// Send a fresh activation code to an account that is still inactive
    pub async fn retry_activation(&self, email: &str) -> Result<PublicProfile> {
        let mut account = self.find_by_email(email).await?.ok_or(Error::NotFound)?;
        if account.active {
            return Err(Error::AlreadyActive);
        }

        self.reissue_code(&mut account, CodePurpose::Activation, ACTIVATION_SUBJECT)
            .await
    }

    /// Send a password reset code
    pub async fn forgot_password(&self, email: &str) -> Result<PublicProfile> {
        let mut account = self.find_by_email(email).await?.ok_or(Error::NotFound)?;
        if account.account_type == AccountType::Federated {
            return Err(Error::FederatedAccount);
        }

        self.reissue_code(&mut account, CodePurpose::PasswordReset, RESET_SUBJECT)
            .await
    }

    /// Set a new password using a reset code
    pub async fn change_password(&self, data: DataChangePassword) -> Result<PublicProfile> {
        let mut account = self
            .database
            .find_account_by_email_and_code(&normalise_email(&data.email), &data.code)
            .await?
            .ok_or(Error::NotFound)?;

        let now = Timestamp::now_utc();
        match account.check_code(CodePurpose::PasswordReset, &data.code, now) {
            CodeCheck::Valid => {}
            CodeCheck::Expired => return Err(Error::CodeExpired),
            CodeCheck::Mismatch => return Err(Error::NotFound),
        }

        account.password = self.config.passwords.hash(&data.password)?;
        account.consume_code();
        account.touch(now);

        let account = self.database.save_account(&account).await?;
        info!("Changed password for account {}", account.id);

        self.publish_event(GatekeepEvent::ChangePassword {
            account_id: account.id.clone(),
        })
        .await;

        Ok(account.to_public())
    }

    /// Log in with email and password
    pub async fn login_local(&self, data: DataLogin) -> Result<LoginResponse> {
        let Some(account) = self.find_by_email(&data.email).await? else {
            self.config.passwords.verify_missing(&data.password);
            return Err(Error::InvalidCredentials);
        };

        account.verify_password(&self.config.passwords, &data.password)?;

        // Only reveal the account state once the password is known to be right.
        if !account.active {
            return Err(Error::InactiveAccount);
        }

        self.start_session(&account).await
    }

    /// Log in with an ID token from the federated identity provider
    pub async fn login_federated(&self, data: DataLoginFederated) -> Result<LoginResponse> {
        let claims = self.federation.verify(&data.id_token).await?;

        let account = match self
            .federation
            .reconcile(&self.database, claims, &self.config.default_role)
            .await?
        {
            Reconciled::Created(account) => match self.database.insert_account(&account).await {
                Ok(()) => {
                    info!("Created federated account {}", account.id);
                    self.publish_event(GatekeepEvent::CreateAccount {
                        account_id: account.id.clone(),
                        email: account.email.clone(),
                        account_type: account.account_type,
                    })
                    .await;

                    account
                }
                // A concurrent first login created it, use that one.
                Err(Error::EmailTaken) => self
                    .find_by_email(&account.email)
                    .await?
                    .ok_or(Error::InternalError)?,
                Err(err) => return Err(err),
            },
            Reconciled::Existing(account) => {
                if account.account_type == AccountType::Local {
                    warn!(
                        "Federated login matched local account {}, credentials left untouched",
                        account.id
                    );

                    self.publish_event(GatekeepEvent::LinkFederatedLogin {
                        account_id: account.id.clone(),
                        account_type: account.account_type,
                    })
                    .await;
                }

                account
            }
        };

        self.start_session(&account).await
    }

    /// Create a local account directly, without sending an activation code
    pub async fn create_account(&self, data: DataCreateAccount) -> Result<PublicProfile> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(Error::EmailTaken);
        }

        let password = self.config.passwords.hash(&data.password)?;
        let mut account = Account::new_local(
            data.email,
            password,
            data.name,
            self.config.default_role.clone(),
            Timestamp::now_utc(),
        );

        account.phone = data.phone;
        account.address = data.address;
        account.image = data.image;

        self.database.insert_account(&account).await?;
        info!("Created account {}", account.id);

        self.publish_event(GatekeepEvent::CreateAccount {
            account_id: account.id.clone(),
            email: account.email.clone(),
            account_type: account.account_type,
        })
        .await;

        Ok(account.to_public())
    }

    /// Update optional profile fields
    pub async fn update_profile(&self, id: &str, data: DataUpdateProfile) -> Result<PublicProfile> {
        let mut account = self
            .database
            .find_account(id)
            .await?
            .ok_or(Error::NotFound)?;

        account.apply_profile(data);
        account.touch(Timestamp::now_utc());

        Ok(self.database.save_account(&account).await?.to_public())
    }

    /// Fetch the public profile of an account
    pub async fn fetch_account(&self, id: &str) -> Result<PublicProfile> {
        self.database
            .find_account(id)
            .await?
            .map(|account| account.to_public())
            .ok_or(Error::NotFound)
    }

    /// Resolve a session token to the account it belongs to
    pub async fn resolve_session(&self, token: &str) -> Result<PublicProfile> {
        let claims = self.sessions.validate(token)?;

        self.database
            .find_account(&claims.sub)
            .await?
            .map(|account| account.to_public())
            .ok_or(Error::InvalidSession)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.database
            .find_account_by_normalised_email(&normalise_email(email))
            .await
    }

    async fn reissue_code(
        &self,
        account: &mut Account,
        purpose: CodePurpose,
        subject: &'static str,
    ) -> Result<PublicProfile> {
        let now = Timestamp::now_utc();
        account.issue_code(purpose, now);
        account.touch(now);

        let account = self.database.save_account(account).await?;

        self.publish_event(GatekeepEvent::IssueCode {
            account_id: account.id.clone(),
            purpose,
        })
        .await;

        self.send_code(&account, subject);
        Ok(account.to_public())
    }

    async fn start_session(&self, account: &Account) -> Result<LoginResponse> {
        let response = self.sessions.login(account)?;

        self.publish_event(GatekeepEvent::CreateSession {
            account_id: account.id.clone(),
        })
        .await;

        Ok(response)
    }

    /// Email the pending code of an already persisted account
    ///
    /// Delivery runs in the background. Failures are logged and otherwise
    /// ignored, the code stays valid.
    fn send_code(&self, account: &Account, subject: &'static str) {
        let Some(verification) = &account.verification else {
            return;
        };

        let context = json!({
            "name": account.name.as_deref().unwrap_or(&account.email),
            "activationCode": verification.code,
        });

        let mailer = self.mailer.clone();
        let to = account.email.clone();
        let account_id = account.id.clone();

        async_std::task::spawn(async move {
            if let Err(err) = mailer.send(&to, subject, CODE_TEMPLATE, context).await {
                error!(
                    "Failed to send {:?} email for account {}: {:?}",
                    subject, account_id, err
                );
            }
        });
    }
}
