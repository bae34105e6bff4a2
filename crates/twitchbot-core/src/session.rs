//! Chat session: connection lifecycle and the read loop.
//!
//! A session owns at most one live connection. The read loop classifies each
//! inbound line, answers keep-alives immediately, and throttles everything
//! else by the configured message delay. It ends in one of two ways:
//! - `Ok(())` after the channel owner sends the shutdown command
//! - `Err(BotError::ReadFailure)` when the transport closes or errors
//!
//! Either way the connection has been closed by the time it returns.

use crate::protocol::{self, classify};
use crate::{BotError, Connector, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};
use twitchbot_types::{ChatCommand, ChatMessage, Credentials, InboundLine, SessionEvent};

/// Longest inbound line accepted, terminator included. IRC caps lines at
/// 512 bytes; Twitch tags can push well past that.
const MAX_LINE_BYTES: u64 = 8192;

/// Immutable settings for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Channel to join, without the leading `#`. Also the owner's login.
    pub channel: String,
    /// Nickname the bot authenticates as.
    pub bot_name: String,
    pub host: String,
    pub port: u16,
    /// Minimum pause after every non-keep-alive line.
    pub message_delay: Duration,
    /// Sent to the channel before a clean shutdown.
    pub farewell: String,
}

impl SessionConfig {
    pub const DEFAULT_HOST: &'static str = "irc.chat.twitch.tv";
    pub const DEFAULT_PORT: u16 = 6667;
    /// Twitch allows 20 messages per 30 seconds for regular users.
    pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(1500);
    pub const DEFAULT_FAREWELL: &'static str = "Shutting down. Bye!";

    pub fn new(channel: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            bot_name: bot_name.into(),
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            message_delay: Self::DEFAULT_MESSAGE_DELAY,
            farewell: Self::DEFAULT_FAREWELL.to_string(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct Connection<S> {
    stream: BufReader<S>,
    connected_at: DateTime<Utc>,
    /// All three auth lines were written.
    joined: bool,
}

/// A single-channel chat session over one transport connection at a time.
pub struct ChatSession<C: Connector> {
    config: SessionConfig,
    connector: C,
    credentials: Option<Credentials>,
    connection: Option<Connection<C::Stream>>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl<C: Connector> ChatSession<C> {
    pub fn new(config: SessionConfig, connector: C) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            config,
            connector,
            credentials: None,
            connection: None,
            event_tx,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Whether the live connection got through PASS/NICK/JOIN.
    pub fn is_joined(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| c.joined)
    }

    /// When the live connection was opened.
    pub fn connected_since(&self) -> Option<DateTime<Utc>> {
        self.connection.as_ref().map(|c| c.connected_at)
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Open the transport. Any previous connection is closed first.
    pub async fn connect(&mut self) -> Result<()> {
        if self.connection.is_some() {
            self.disconnect().await;
        }

        let addr = self.config.addr();
        info!(target: "twitchbot::session", "Connecting to {}...", addr);

        match self.connector.connect(&self.config.host, self.config.port).await {
            Ok(stream) => {
                let connected_at = Utc::now();
                self.connection = Some(Connection {
                    stream: BufReader::new(stream),
                    connected_at,
                    joined: false,
                });
                info!(target: "twitchbot::session", "Connected to {}", addr);
                self.emit(SessionEvent::Connected {
                    addr,
                    at: connected_at,
                });
                Ok(())
            }
            Err(e) => {
                warn!(target: "twitchbot::session", "Cannot connect to {}: {}", addr, e);
                self.emit(SessionEvent::ConnectFailed {
                    addr: addr.clone(),
                    message: e.to_string(),
                });
                Err(BotError::ConnectFailure { addr, source: e })
            }
        }
    }

    /// Close the transport if open. Safe to call repeatedly.
    pub async fn disconnect(&mut self) {
        let Some(mut conn) = self.connection.take() else {
            return;
        };

        if let Err(e) = conn.stream.shutdown().await {
            debug!(target: "twitchbot::session", "Error shutting down stream: {}", e);
        }
        drop(conn.stream);

        let uptime_secs = (Utc::now() - conn.connected_at).num_milliseconds() as f64 / 1000.0;
        info!(target: "twitchbot::session", "Closed chat after {:.1}s", uptime_secs);
        self.emit(SessionEvent::Disconnected { uptime_secs });
    }

    /// Authenticate and join the configured channel.
    ///
    /// Writes PASS, NICK and JOIN in that order without waiting for a reply.
    /// A failed write is logged and the remaining lines are skipped; the
    /// read loop will see the broken transport.
    pub async fn join_channel(&mut self) -> Result<()> {
        let conn = self.connection.as_mut().ok_or(BotError::NotConnected)?;
        let creds = self
            .credentials
            .as_ref()
            .ok_or_else(|| BotError::CredentialUnavailable("no credentials loaded".into()))?;

        info!(target: "twitchbot::session", "Joining #{}...", self.config.channel);

        let lines = [
            (protocol::pass_line(creds.secret()), "PASS ***".to_string()),
            (
                protocol::nick_line(&self.config.bot_name),
                format!("NICK {}", self.config.bot_name),
            ),
            (
                protocol::join_line(&self.config.channel),
                format!("JOIN #{}", self.config.channel),
            ),
        ];

        for (line, shown) in &lines {
            debug!(target: "twitchbot::irc", "> {}", shown);
            if let Err(e) = write_line(&mut conn.stream, line).await {
                warn!(target: "twitchbot::irc", "Failed to write {}: {}", shown, e);
                return Ok(());
            }
        }
        conn.joined = true;

        info!(
            target: "twitchbot::session",
            "Joined #{} as {}",
            self.config.channel,
            self.config.bot_name
        );
        self.emit(SessionEvent::Joined {
            channel: self.config.channel.clone(),
        });
        Ok(())
    }

    /// Send a chat message to the channel.
    pub async fn say(&mut self, message: &str) -> Result<()> {
        if message.is_empty() {
            return Err(BotError::EmptyMessage);
        }

        let conn = self.connection.as_mut().ok_or(BotError::NotConnected)?;
        let line = protocol::privmsg_line(&self.config.channel, message);
        write_line(&mut conn.stream, &line)
            .await
            .map_err(BotError::WriteFailure)?;

        debug!(target: "twitchbot::irc", "> {}", line.trim_end());
        self.emit(SessionEvent::Said {
            message: message.to_string(),
        });
        Ok(())
    }

    /// Run the read loop until clean shutdown or a read failure.
    ///
    /// The connection is closed on every exit path.
    pub async fn read_loop(&mut self) -> Result<()> {
        let result = self.read_lines().await;
        self.disconnect().await;
        result
    }

    async fn read_lines(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let conn = self.connection.as_mut().ok_or(BotError::NotConnected)?;
            match read_capped_line(&mut conn.stream, &mut buf).await {
                Ok(LineRead::Eof) => {
                    return Err(self.read_failed("connection closed by server".into()));
                }
                Ok(LineRead::Line) => {}
                Ok(LineRead::Overlong) => {
                    warn!(
                        target: "twitchbot::irc",
                        "Dropped inbound line longer than {} bytes",
                        MAX_LINE_BYTES
                    );
                    tokio::time::sleep(self.config.message_delay).await;
                    continue;
                }
                Err(e) => return Err(self.read_failed(e.to_string())),
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);

            match classify(line) {
                InboundLine::KeepAlive => {
                    self.reply_keep_alive().await;
                    continue;
                }
                InboundLine::Chat(msg) => {
                    info!(target: "twitchbot::irc", "#{} {}: {}", msg.channel, msg.user, msg.body);
                    self.emit(SessionEvent::Message(msg.clone()));

                    if self.is_shutdown_request(&msg) {
                        self.shutdown_requested(&msg).await;
                        return Ok(());
                    }
                    if let Some(ChatCommand::Other { name, arg }) = ChatCommand::parse(&msg.body) {
                        debug!(
                            target: "twitchbot::session",
                            "Ignoring command !{} (arg: {:?}) from {}",
                            name,
                            arg,
                            msg.user
                        );
                    }
                }
                InboundLine::Event { kind, channel } => {
                    debug!(target: "twitchbot::irc", "{} on #{}", kind, channel);
                }
                InboundLine::Unrecognized => {
                    trace!(target: "twitchbot::irc", "< {}", line);
                }
            }

            tokio::time::sleep(self.config.message_delay).await;
        }
    }

    /// Only the channel owner may stop the bot. The owner is whoever logs in
    /// with the channel's own name.
    fn is_shutdown_request(&self, msg: &ChatMessage) -> bool {
        msg.user == self.config.channel
            && ChatCommand::parse(&msg.body).is_some_and(|cmd| cmd.is_shutdown())
    }

    async fn shutdown_requested(&mut self, msg: &ChatMessage) {
        info!(
            target: "twitchbot::session",
            "Shutdown command received from {}. Shutting down now...",
            msg.user
        );
        self.emit(SessionEvent::ShutdownRequested {
            by: msg.user.clone(),
        });

        let farewell = self.config.farewell.clone();
        if let Err(e) = self.say(&farewell).await {
            warn!(target: "twitchbot::session", "Failed to send farewell: {}", e);
        }
    }

    async fn reply_keep_alive(&mut self) {
        trace!(target: "twitchbot::irc::ping", "< {}", protocol::KEEP_ALIVE_PROBE);
        let Some(conn) = self.connection.as_mut() else {
            return;
        };

        match write_line(&mut conn.stream, &protocol::keep_alive_reply_line()).await {
            Ok(()) => {
                trace!(target: "twitchbot::irc::ping", "> {}", protocol::KEEP_ALIVE_REPLY);
                self.emit(SessionEvent::KeepAlive);
            }
            Err(e) => {
                warn!(target: "twitchbot::irc::ping", "Failed to answer keep-alive: {}", e);
            }
        }
    }

    fn read_failed(&self, message: String) -> BotError {
        warn!(target: "twitchbot::session", "Read failed: {}", message);
        self.emit(SessionEvent::ReadFailed {
            message: message.clone(),
        });
        BotError::ReadFailure(message)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    /// `buf` holds one line, or the unterminated tail before EOF.
    Line,
    /// Line exceeded [`MAX_LINE_BYTES`] and was skipped through its newline.
    Overlong,
}

/// Read one line into `buf`, never buffering more than [`MAX_LINE_BYTES`].
async fn read_capped_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<LineRead> {
    if (&mut *reader).take(MAX_LINE_BYTES).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.ends_with(b"\n") || (buf.len() as u64) < MAX_LINE_BYTES {
        return Ok(LineRead::Line);
    }

    buf.clear();
    loop {
        if (&mut *reader).take(MAX_LINE_BYTES).read_until(b'\n', buf).await? == 0 {
            return Ok(LineRead::Eof);
        }
        if buf.ends_with(b"\n") {
            buf.clear();
            return Ok(LineRead::Overlong);
        }
        buf.clear();
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
