//! Bang commands recognized in chat message bodies.

/// Literal body that asks the bot to shut down.
pub const SHUTDOWN_COMMAND: &str = "!tbdown";

/// A command parsed out of a chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exact `!tbdown`. Only honored from the channel owner.
    Shutdown,
    /// Any other `!name [arg]` body. Reserved for future dispatch.
    Other {
        name: String,
        arg: Option<String>,
    },
}

impl ChatCommand {
    /// Parse a message body. Returns `None` for plain chat.
    ///
    /// Shutdown is an exact, case-sensitive match on the whole body, so
    /// `!tbdown now` or `!TBDOWN` come back as [`ChatCommand::Other`].
    pub fn parse(body: &str) -> Option<Self> {
        if body == SHUTDOWN_COMMAND {
            return Some(ChatCommand::Shutdown);
        }

        let rest = body.strip_prefix('!')?;
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_end);
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }

        Some(ChatCommand::Other {
            name: name.to_string(),
            arg: tail.split_whitespace().next().map(str::to_string),
        })
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, ChatCommand::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shutdown_exact() {
        assert_eq!(ChatCommand::parse("!tbdown"), Some(ChatCommand::Shutdown));
    }

    #[test]
    fn test_shutdown_is_case_sensitive() {
        let cmd = ChatCommand::parse("!TBDOWN").unwrap();
        assert!(!cmd.is_shutdown());
    }

    #[test]
    fn test_shutdown_with_trailing_text_is_other() {
        assert_eq!(
            ChatCommand::parse("!tbdown now"),
            Some(ChatCommand::Other {
                name: "tbdown".to_string(),
                arg: Some("now".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_plain_chat() {
        assert_eq!(ChatCommand::parse("hello there"), None);
        assert_eq!(ChatCommand::parse(""), None);
        assert_eq!(ChatCommand::parse("!"), None);
        assert_eq!(ChatCommand::parse("! spaced"), None);
        assert_eq!(ChatCommand::parse("!?!"), None);
    }

    #[test]
    fn test_parse_other_without_arg() {
        assert_eq!(
            ChatCommand::parse("!uptime"),
            Some(ChatCommand::Other {
                name: "uptime".to_string(),
                arg: None,
            })
        );
    }
}
