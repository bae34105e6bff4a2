//! Connection lifecycle and line-protocol state machine for twitchbot.

mod bot;
mod credentials;
mod error;
mod protocol;
mod session;
mod transport;

pub use bot::{Bot, ReconnectPolicy};
pub use credentials::{CredentialProvider, FileCredentialProvider, StaticCredentialProvider};
pub use error::BotError;
pub use protocol::{KEEP_ALIVE_PROBE, KEEP_ALIVE_REPLY, classify};
pub use session::{ChatSession, SessionConfig};
pub use transport::{Connector, TcpConnector};

/// Result type for twitchbot operations.
pub type Result<T> = std::result::Result<T, BotError>;
