//! Error types for twitchbot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Credentials unavailable: {0}")]
    CredentialUnavailable(String),

    #[error("Cannot connect to {addr}: {source}")]
    ConnectFailure {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from connection: {0}")]
    ReadFailure(String),

    #[error("Message was empty")]
    EmptyMessage,

    #[error("Failed to write to connection: {0}")]
    WriteFailure(#[source] std::io::Error),

    #[error("Not connected")]
    NotConnected,
}

impl BotError {
    /// Whether the driver should reconnect after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BotError::ConnectFailure { .. } | BotError::ReadFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(BotError::ReadFailure("eof".into()).is_retryable());
        assert!(BotError::ConnectFailure {
            addr: "localhost:6667".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        }
        .is_retryable());

        assert!(!BotError::CredentialUnavailable("missing".into()).is_retryable());
        assert!(!BotError::EmptyMessage.is_retryable());
        assert!(!BotError::NotConnected.is_retryable());
        assert!(
            !BotError::WriteFailure(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
                .is_retryable()
        );
    }

    #[test]
    fn test_connect_failure_message_names_address() {
        let err = BotError::ConnectFailure {
            addr: "irc.chat.twitch.tv:6667".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert!(err.to_string().contains("irc.chat.twitch.tv:6667"));
    }
}
