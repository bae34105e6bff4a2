//! Top-level driver: load credentials, then connect/join/read until a clean stop.

use crate::{ChatSession, Connector, CredentialProvider, Result};
use std::time::Duration;
use tracing::{error, info, warn};

/// How the driver reacts to retryable failures.
///
/// The default retries forever with a fixed one-second delay and no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Pause before each new attempt.
    pub delay: Duration,
    /// Give up after this many failed attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Whether another attempt is allowed after `failures` failed ones.
    pub fn allows_retry(&self, failures: u32) -> bool {
        self.max_attempts.is_none_or(|max| failures < max)
    }
}

/// Keeps a chat session connected until the owner shuts it down.
pub struct Bot<C: Connector> {
    session: ChatSession<C>,
    policy: ReconnectPolicy,
}

impl<C: Connector> Bot<C> {
    pub fn new(session: ChatSession<C>, policy: ReconnectPolicy) -> Self {
        Self { session, policy }
    }

    pub fn session(&self) -> &ChatSession<C> {
        &self.session
    }

    /// Run until clean shutdown.
    ///
    /// Credential failures abort immediately. Connect and read failures are
    /// retried per the policy; the last error is returned once it gives up.
    /// Only consecutive failures count toward the limit: an attempt that
    /// joins the channel starts a fresh streak.
    pub async fn start<P: CredentialProvider>(&mut self, provider: &P) -> Result<()> {
        let creds = provider.load().inspect_err(|e| {
            error!(target: "twitchbot::bot", "{}. Aborting...", e);
        })?;
        self.session.set_credentials(creds);

        let mut failures = 0u32;
        loop {
            let err = match self.run_attempt(&mut failures).await {
                Ok(()) => {
                    info!(target: "twitchbot::bot", "Bot stopped");
                    return Ok(());
                }
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            failures += 1;
            if !self.policy.allows_retry(failures) {
                error!(
                    target: "twitchbot::bot",
                    "Giving up after {} failed attempts: {}",
                    failures,
                    err
                );
                return Err(err);
            }

            tokio::time::sleep(self.policy.delay).await;
            warn!(target: "twitchbot::bot", "{}", err);
            info!(target: "twitchbot::bot", "Starting bot again (attempt {})...", failures + 1);
        }
    }

    async fn run_attempt(&mut self, failures: &mut u32) -> Result<()> {
        self.session.connect().await?;
        if let Err(e) = self.session.join_channel().await {
            self.session.disconnect().await;
            return Err(e);
        }
        if self.session.is_joined() {
            *failures = 0;
        }
        self.session.read_loop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_unbounded() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert!(policy.allows_retry(0));
        assert!(policy.allows_retry(u32::MAX));
    }

    #[test]
    fn test_max_attempts_bounds_retries() {
        let policy = ReconnectPolicy::fixed(Duration::from_millis(5)).with_max_attempts(3);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }
}
