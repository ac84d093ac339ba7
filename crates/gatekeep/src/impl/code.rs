use std::time::Duration;

use iso8601_timestamp::Timestamp;

use crate::models::{Account, CodeCheck, CodePurpose, VerificationCode};

/// Verification codes last 5 minutes
pub const CODE_LIFETIME: Duration = Duration::from_secs(5 * 60);

impl VerificationCode {
    /// Generate a new random code valid from `now` until `now + CODE_LIFETIME`
    pub fn issue(purpose: CodePurpose, now: Timestamp) -> VerificationCode {
        VerificationCode {
            code: nanoid!(32),
            expiry: Timestamp::from_unix_timestamp_ms(
                now.to_unix_timestamp_ms() + CODE_LIFETIME.as_millis() as i64,
            ),
            purpose,
        }
    }

    /// Check if this code has expired
    ///
    /// A code is still good at the exact instant of its expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.to_unix_timestamp_ms() > self.expiry.to_unix_timestamp_ms()
    }

    /// Compare a presented code against this one
    pub fn validate(&self, purpose: CodePurpose, presented: &str, now: Timestamp) -> CodeCheck {
        if self.purpose != purpose || self.code != presented {
            CodeCheck::Mismatch
        } else if self.is_expired(now) {
            CodeCheck::Expired
        } else {
            CodeCheck::Valid
        }
    }
}

impl Account {
    /// Replace any pending code with a fresh one
    pub fn issue_code(&mut self, purpose: CodePurpose, now: Timestamp) -> &VerificationCode {
        self.verification.insert(VerificationCode::issue(purpose, now))
    }

    /// Check a presented code against the pending one, if any
    pub fn check_code(&self, purpose: CodePurpose, presented: &str, now: Timestamp) -> CodeCheck {
        self.verification
            .as_ref()
            .map(|verification| verification.validate(purpose, presented, now))
            .unwrap_or(CodeCheck::Mismatch)
    }

    /// Invalidate the pending code so it cannot be replayed
    pub fn consume_code(&mut self) {
        self.verification = None;
    }
}
