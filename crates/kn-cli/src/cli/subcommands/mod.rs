mod auth;
mod filter;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use filter::FilterArgs;
