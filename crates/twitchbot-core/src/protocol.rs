//! Twitch IRC line classification and outbound line formatting.

use once_cell::sync::Lazy;
use regex::Regex;
use twitchbot_types::{ChatMessage, InboundLine, MessageType};

/// Server keep-alive probe, matched against the whole line.
pub const KEEP_ALIVE_PROBE: &str = "PING :tmi.twitch.tv";

/// Reply to [`KEEP_ALIVE_PROBE`]. The server accepts this exact text.
pub const KEEP_ALIVE_REPLY: &str = "PONG: tmi.twitch.tv";

pub(crate) const LINE_TERMINATOR: &str = "\r\n";

/// `:<user>!<ident>@<host>.<suffix> <VERB> #<channel>[ :<body>]`
static MESSAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(\w+)!\w+@\w+\.[\w.]+ ([A-Z]+) #(\w+)(?: :(.*))?$")
        .expect("Invalid message regex")
});

/// Classify one inbound line. Trailing CR/LF is ignored.
pub fn classify(line: &str) -> InboundLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if line == KEEP_ALIVE_PROBE {
        return InboundLine::KeepAlive;
    }

    let Some(caps) = MESSAGE_REGEX.captures(line) else {
        return InboundLine::Unrecognized;
    };

    let channel = caps[3].to_string();
    match MessageType::parse(&caps[2]) {
        MessageType::Privmsg => InboundLine::Chat(ChatMessage {
            user: caps[1].to_string(),
            channel,
            body: caps.get(4).map_or_else(String::new, |m| m.as_str().to_string()),
        }),
        kind => InboundLine::Event { kind, channel },
    }
}

pub(crate) fn pass_line(secret: &str) -> String {
    format!("PASS {}{}", secret, LINE_TERMINATOR)
}

pub(crate) fn nick_line(name: &str) -> String {
    format!("NICK {}{}", name, LINE_TERMINATOR)
}

pub(crate) fn join_line(channel: &str) -> String {
    format!("JOIN #{}{}", channel, LINE_TERMINATOR)
}

pub(crate) fn privmsg_line(channel: &str, message: &str) -> String {
    format!("PRIVMSG #{} {}{}", channel, message, LINE_TERMINATOR)
}

pub(crate) fn keep_alive_reply_line() -> String {
    format!("{}{}", KEEP_ALIVE_REPLY, LINE_TERMINATOR)
}
