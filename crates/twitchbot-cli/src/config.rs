//! Bot configuration.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use twitchbot_core::{FileCredentialProvider, ReconnectPolicy, SessionConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Channel to join. The channel's own account may stop the bot.
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub bot_name: String,
    #[serde(default = "default_message_delay_ms")]
    pub message_delay_ms: u64,
    #[serde(default = "default_farewell")]
    pub farewell: String,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Unbounded when absent.
    #[serde(default)]
    pub max_reconnect_attempts: Option<u32>,
    #[serde(default = "FileCredentialProvider::default_path")]
    pub credentials_path: PathBuf,
}

fn default_host() -> String {
    SessionConfig::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    SessionConfig::DEFAULT_PORT
}

fn default_message_delay_ms() -> u64 {
    SessionConfig::DEFAULT_MESSAGE_DELAY.as_millis() as u64
}

fn default_farewell() -> String {
    SessionConfig::DEFAULT_FAREWELL.to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            channel: String::new(),
            bot_name: String::new(),
            message_delay_ms: default_message_delay_ms(),
            farewell: default_farewell(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: None,
            credentials_path: FileCredentialProvider::default_path(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }

    /// Reject settings no session could run with.
    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().trim_start_matches('#').is_empty() {
            bail!("channel must be set (config file or --channel)");
        }
        if self.bot_name.trim().is_empty() {
            bail!("bot_name must be set (config file or --name)");
        }
        if self.farewell.is_empty() {
            bail!("farewell must not be empty");
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            channel: self.channel.trim().trim_start_matches('#').to_string(),
            bot_name: self.bot_name.clone(),
            host: self.host.clone(),
            port: self.port,
            message_delay: Duration::from_millis(self.message_delay_ms),
            farewell: self.farewell.clone(),
        }
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.reconnect_delay_ms),
            max_attempts: self.max_reconnect_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "irc.chat.twitch.tv");
        assert_eq!(config.port, 6667);
        assert_eq!(config.message_delay_ms, 1500);
        assert_eq!(config.reconnect_delay_ms, 1000);
        assert!(config.max_reconnect_attempts.is_none());
        assert!(config.credentials_path.ends_with("twitchbot/oauth.json"));
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"channel = "somechannel""#).unwrap();
        writeln!(file, r#"bot_name = "mybot""#).unwrap();
        writeln!(file, "message_delay_ms = 500").unwrap();
        writeln!(file, "max_reconnect_attempts = 5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.channel, "somechannel");
        assert_eq!(config.bot_name, "mybot");
        assert_eq!(config.port, 6667);
        config.validate().unwrap();

        let session = config.session_config();
        assert_eq!(session.message_delay, Duration::from_millis(500));
        assert_eq!(session.addr(), "irc.chat.twitch.tv:6667");

        let policy = config.reconnect_policy();
        assert_eq!(policy.max_attempts, Some(5));
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_validate_requires_channel_and_name() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.channel = "somechannel".to_string();
        assert!(config.validate().is_err());

        config.bot_name = "mybot".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_config_strips_hash() {
        let config = Config {
            channel: "#somechannel".to_string(),
            bot_name: "mybot".to_string(),
            ..Config::default()
        };
        assert_eq!(config.session_config().channel, "somechannel");
    }
}
