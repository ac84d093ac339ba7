#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(tag = "type")]
pub enum Error {
    IncorrectData {
        with: &'static str,
    },
    DatabaseError {
        operation: &'static str,
        with: &'static str,
    },
    InternalError,
    WriteConflict,
    RequestFailed,

    RenderFail,
    EmailFailed,

    EmailTaken,
    NotFound,
    NotFoundOrBadCode,
    CodeExpired,
    AlreadyActive,
    InactiveAccount,
    FederatedAccount,

    InvalidCredentials,
    InvalidToken,
    InvalidFederatedToken,
    InvalidSession,
}

impl Error {
    /// Whether this error describes the caller's input rather than a deployment defect
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::EmailTaken
                | Error::NotFound
                | Error::NotFoundOrBadCode
                | Error::CodeExpired
                | Error::AlreadyActive
                | Error::InactiveAccount
                | Error::FederatedAccount
                | Error::InvalidCredentials
                | Error::InvalidToken
                | Error::InvalidFederatedToken
                | Error::InvalidSession
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IncorrectData { with } => write!(f, "incorrect data in {with}"),
            Error::DatabaseError { operation, with } => {
                write!(f, "database error during {operation} on {with}")
            }
            Error::InternalError => write!(f, "internal error"),
            Error::WriteConflict => write!(f, "account was modified concurrently"),
            Error::RequestFailed => write!(f, "outbound request failed"),
            Error::RenderFail => write!(f, "failed to render email template"),
            Error::EmailFailed => write!(f, "failed to send email"),
            Error::EmailTaken => write!(f, "email already exists"),
            Error::NotFound => write!(f, "account not found"),
            Error::NotFoundOrBadCode => write!(f, "account not found or invalid code"),
            Error::CodeExpired => write!(f, "code expired"),
            Error::AlreadyActive => write!(f, "account already active"),
            Error::InactiveAccount => write!(f, "account has not been activated"),
            Error::FederatedAccount => write!(f, "account signs in with an external provider"),
            Error::InvalidCredentials => write!(f, "invalid credentials"),
            Error::InvalidToken => write!(f, "invalid token"),
            Error::InvalidFederatedToken => write!(f, "invalid federated identity token"),
            Error::InvalidSession => write!(f, "invalid session"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type Success = Result<()>;
