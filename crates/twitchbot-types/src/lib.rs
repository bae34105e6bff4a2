//! Shared types for the twitchbot chat client.

mod command;
mod credentials;
mod event;
mod line;

pub use command::*;
pub use credentials::*;
pub use event::*;
pub use line::*;
