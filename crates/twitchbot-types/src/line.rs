//! Classified inbound protocol lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IRC message type carried by a matched protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    /// A user's chat message to a channel.
    Privmsg,
    /// Any other verb (JOIN, PART, NOTICE, ...). Parsed but not acted on.
    Other(String),
}

impl MessageType {
    pub fn parse(verb: &str) -> Self {
        match verb {
            "PRIVMSG" => MessageType::Privmsg,
            other => MessageType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Privmsg => "PRIVMSG",
            MessageType::Other(verb) => verb,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender's login name.
    pub user: String,
    /// Channel the message was posted to, without the leading `#`.
    pub channel: String,
    /// Message text. Empty when the line had no trailing segment.
    pub body: String,
}

/// One inbound line after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    /// Server liveness probe that must be answered immediately.
    KeepAlive,
    /// A `PRIVMSG` to a channel.
    Chat(ChatMessage),
    /// A well-formed protocol line with a verb other than `PRIVMSG`.
    Event { kind: MessageType, channel: String },
    /// Anything that does not match the protocol line pattern.
    Unrecognized,
}
