use std::{ops::Deref, sync::Arc};

use self::definition::AbstractDatabase;

pub mod definition;

mod dummy;

pub use dummy::DummyDb;

#[derive(Clone)]
pub enum Database {
    /// In-memory store
    Dummy(DummyDb),
    /// Any other storage engine
    Custom(Arc<dyn AbstractDatabase>),
}

impl Default for Database {
    fn default() -> Self {
        Self::Dummy(Default::default())
    }
}

impl Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match self {
            Database::Dummy(dummy) => dummy,
            Database::Custom(custom) => custom.as_ref(),
        }
    }
}
