#[macro_use]
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate nanoid;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_json;

#[cfg(feature = "schemas")]
#[macro_use]
extern crate schemars;

mod result;
pub use result::*;

pub mod config;
pub mod database;
pub mod events;
pub mod r#impl;
pub mod mail;
pub mod models;
pub mod util;

#[cfg(test)]
mod test;

pub use config::Config;
pub use database::Database;
pub use events::GatekeepEvent;
pub use mail::{MailDispatcher, Mailer};
pub use r#impl::{FederatedIdentityResolver, FederatedTokenVerifier, SessionIssuer};

use std::sync::Arc;

use async_std::channel::Sender;

/// Gatekeep state
///
/// Everything in here is fixed once constructed and is cheap to clone,
/// so one instance can be shared by every request handler.
#[derive(Clone)]
pub struct Gatekeep {
    pub config: Config,
    pub database: Database,
    pub mailer: Mailer,
    pub sessions: SessionIssuer,
    pub federation: FederatedIdentityResolver,
    pub event_channel: Option<Sender<GatekeepEvent>>,
}

impl Gatekeep {
    /// Assemble state from configuration and collaborators
    pub fn new(
        config: Config,
        database: Database,
        mailer: Mailer,
        verifier: Arc<dyn FederatedTokenVerifier>,
    ) -> Gatekeep {
        let sessions = SessionIssuer::new(&config.session);
        let federation = FederatedIdentityResolver::new(verifier, config.federation.audience.clone());

        Gatekeep {
            config,
            database,
            mailer,
            sessions,
            federation,
            event_channel: None,
        }
    }

    /// Publish lifecycle events to the given channel
    pub fn with_event_channel(mut self, sender: Sender<GatekeepEvent>) -> Gatekeep {
        self.event_channel = Some(sender);
        self
    }

    pub async fn publish_event(&self, event: GatekeepEvent) {
        if let Some(sender) = &self.event_channel {
            if let Err(err) = sender.send(event).await {
                error!("Failed to publish a Gatekeep event: {:?}", err);
            }
        }
    }
}
