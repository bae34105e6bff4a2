//! Authentication secret for the chat server.

use serde::Deserialize;
use std::fmt;

/// OAuth record as stored on disk: `{"password": "oauth:..."}`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    password: String,
}

impl Credentials {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// The secret sent with `PASS`.
    pub fn secret(&self) -> &str {
        &self.password
    }

    /// A credential with an empty or blank secret can never authenticate.
    pub fn is_blank(&self) -> bool {
        self.password.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_password_record() {
        let creds: Credentials = serde_json::from_str(r#"{"password":"oauth:abc123"}"#).unwrap();
        assert_eq!(creds.secret(), "oauth:abc123");
        assert!(!creds.is_blank());
    }

    #[test]
    fn test_missing_field_is_error() {
        assert!(serde_json::from_str::<Credentials>(r#"{"token":"x"}"#).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("oauth:topsecret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_blank_secret() {
        assert!(Credentials::new("").is_blank());
        assert!(Credentials::new("   ").is_blank());
    }
}
