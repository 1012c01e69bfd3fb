/// Credential records and token values
///
/// `User` lives inside the credential store; everything handed out of the
/// store is a snapshot clone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token value paired with its expiry (Unix timestamp, seconds)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub expires: i64,
}

impl Token {
    pub fn new(value: String, expires: i64) -> Self {
        Self { value, expires }
    }

    /// Active iff `expires > now`
    pub fn is_active(&self, now: i64) -> bool {
        self.expires > now
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[redacted]")
            .field("expires", &self.expires)
            .finish()
    }
}

/// Access and refresh token handed back after authenticate/refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: Token,
    pub refresh_token: Token,
}

/// Stored user record
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password_hash: Vec<u8>,
    pub(crate) refresh_token: Option<Token>,
}

impl User {
    pub(crate) fn new(username: String, password_hash: Vec<u8>) -> Self {
        Self {
            username,
            password_hash,
            refresh_token: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &[u8] {
        &self.password_hash
    }

    pub fn refresh_token(&self) -> Option<&Token> {
        self.refresh_token.as_ref()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("refresh_token", &self.refresh_token)
            .finish_non_exhaustive()
    }
}
