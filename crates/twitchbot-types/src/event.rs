//! Lifecycle events broadcast by a chat session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ChatMessage;

/// Events emitted by a chat session as it moves through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Transport stream opened.
    Connected { addr: String, at: DateTime<Utc> },
    /// Transport stream could not be opened.
    ConnectFailed { addr: String, message: String },
    /// PASS/NICK/JOIN written for the channel.
    Joined { channel: String },
    /// Keep-alive probe answered.
    KeepAlive,
    /// Chat message received.
    Message(ChatMessage),
    /// Channel owner sent the shutdown command.
    ShutdownRequested { by: String },
    /// Outbound chat line written.
    Said { message: String },
    /// Read side failed; a `Disconnected` event follows.
    ReadFailed { message: String },
    /// Transport stream closed.
    Disconnected { uptime_secs: f64 },
}
