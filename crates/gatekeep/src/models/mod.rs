mod account;
mod data;
mod federated;
mod secret;
mod session;

pub use account::*;
pub use data::*;
pub use federated::*;
pub use secret::*;
pub use session::*;
