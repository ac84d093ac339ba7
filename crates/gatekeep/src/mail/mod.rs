use std::{ops::Deref, sync::Arc};

use serde_json::Value;

use crate::Success;

mod smtp;

pub use smtp::SmtpMailer;

/// Outbound email delivery
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Render `template` with `context` and deliver it to `to`
    async fn send(&self, to: &str, subject: &str, template: &str, context: Value) -> Success;
}

/// Writes emails to the log instead of delivering them
#[derive(Default, Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl MailDispatcher for LogMailer {
    async fn send(&self, to: &str, subject: &str, template: &str, _context: Value) -> Success {
        info!("Not sending email {:?} ({}) to {}", subject, template, to);
        Ok(())
    }
}

#[derive(Clone)]
pub enum Mailer {
    Log(LogMailer),
    Smtp(SmtpMailer),
    Custom(Arc<dyn MailDispatcher>),
}

impl Default for Mailer {
    fn default() -> Self {
        Self::Log(LogMailer)
    }
}

impl Deref for Mailer {
    type Target = dyn MailDispatcher;

    fn deref(&self) -> &Self::Target {
        match self {
            Mailer::Log(log) => log,
            Mailer::Smtp(smtp) => smtp,
            Mailer::Custom(custom) => custom.as_ref(),
        }
    }
}
