mod account;
mod code;
mod credentials;
mod federation;
mod lifecycle;
mod secret;
mod session;

pub use code::CODE_LIFETIME;
pub use federation::*;
pub use lifecycle::{ACTIVATION_SUBJECT, CODE_TEMPLATE, RESET_SUBJECT};
pub use session::SessionIssuer;
