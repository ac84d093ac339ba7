use crate::models::{AccountType, CodePurpose};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event_type")]
pub enum GatekeepEvent {
    CreateAccount {
        account_id: String,
        email: String,
        account_type: AccountType,
    },
    IssueCode {
        account_id: String,
        purpose: CodePurpose,
    },
    ActivateAccount {
        account_id: String,
    },
    ChangePassword {
        account_id: String,
    },
    /// A federated login matched an account that already existed
    LinkFederatedLogin {
        account_id: String,
        account_type: AccountType,
    },
    CreateSession {
        account_id: String,
    },
}
