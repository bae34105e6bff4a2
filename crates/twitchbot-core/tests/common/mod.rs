//! Common test utilities for driver integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use twitchbot_core::{Connector, SessionConfig};

/// Connector that hands out scripted duplex pipes in order and refuses once
/// they run out.
pub struct ScriptedConnector {
    streams: Mutex<VecDeque<DuplexStream>>,
    attempts: AtomicUsize,
}

impl ScriptedConnector {
    pub fn new(streams: Vec<DuplexStream>) -> Self {
        Self {
            streams: Mutex::new(streams.into()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of connect calls so far, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for ScriptedConnector {
    type Stream = DuplexStream;

    async fn connect(&self, _host: &str, _port: u16) -> std::io::Result<DuplexStream> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let next = self.streams.lock().unwrap().pop_front();
        next.ok_or_else(|| std::io::Error::from(std::io::ErrorKind::ConnectionRefused))
    }
}

/// Session config for channel `owner`, bot `mybot`, with a tiny message delay.
pub fn test_config() -> SessionConfig {
    let mut config = SessionConfig::new("owner", "mybot");
    config.host = "localhost".to_string();
    config.message_delay = Duration::from_millis(1);
    config.farewell = "Bye!".to_string();
    config
}

/// A pipe whose server side has already queued `script`.
pub async fn scripted_pipe(script: &str) -> (DuplexStream, DuplexStream) {
    let (client, mut server) = tokio::io::duplex(8192);
    server.write_all(script.as_bytes()).await.unwrap();
    (client, server)
}

/// Drain everything the bot wrote until it closed its end.
pub async fn drain(mut server: DuplexStream) -> String {
    let mut out = String::new();
    server.read_to_string(&mut out).await.unwrap();
    out
}
