//! Credential providers.

use crate::{BotError, Result};
use std::path::{Path, PathBuf};
use twitchbot_types::Credentials;

/// Supplies the authentication secret for a session.
pub trait CredentialProvider {
    fn load(&self) -> Result<Credentials>;
}

/// Reads `{"password": "oauth:..."}` from a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/twitchbot/oauth.json`, or `./oauth.json` if there is no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("twitchbot")
            .join("oauth.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCredentialProvider {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl CredentialProvider for FileCredentialProvider {
    fn load(&self) -> Result<Credentials> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            BotError::CredentialUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let creds: Credentials = serde_json::from_str(&content).map_err(|e| {
            BotError::CredentialUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        if creds.is_blank() {
            return Err(BotError::CredentialUnavailable(format!(
                "{}: password is empty",
                self.path.display()
            )));
        }

        tracing::debug!(target: "twitchbot::startup", "Loaded credentials from {}", self.path.display());
        Ok(creds)
    }
}

/// Hands out a fixed secret.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    creds: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            creds: Credentials::new(secret),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn load(&self) -> Result<Credentials> {
        if self.creds.is_blank() {
            return Err(BotError::CredentialUnavailable("password is empty".into()));
        }
        Ok(self.creds.clone())
    }
}
