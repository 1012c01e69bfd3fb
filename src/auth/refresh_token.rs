/// Refresh Token Management
///
/// Handles refresh token generation, rotation and revocation on top of the
/// credential store. Refresh tokens are:
/// - 64 cryptographically random bytes, base64 encoded
/// - Held one per user; issuing a new one replaces the old
/// - Single-use: a successful refresh rotates the value
/// - Matched only while `expires > now`; expired values stay stored but unusable

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{thread_rng, RngCore};

use crate::auth::models::{Token, User};
use crate::auth::store::CredentialStore;
use crate::auth::unix_now;
use crate::error::{AuthError, StoreError};

const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate a new refresh token value
///
/// 512 bits from the thread-local CSPRNG; uniqueness across users is not
/// checked.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    thread_rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

pub struct RefreshTokenManager {
    store: Arc<CredentialStore>,
    lifetime: i64,
}

impl RefreshTokenManager {
    /// # Arguments
    /// * `store` - Credential store holding the tokens
    /// * `lifetime` - Refresh token lifetime in seconds
    pub fn new(store: Arc<CredentialStore>, lifetime: i64) -> Self {
        Self { store, lifetime }
    }

    fn new_token(&self) -> Token {
        Token::new(generate_refresh_token(), unix_now().saturating_add(self.lifetime))
    }

    /// Issue a fresh refresh token for `user`, replacing any previous one
    ///
    /// # Errors
    /// Returns error if the user is not in the store
    pub fn issue(&self, user: &User) -> Result<Token, StoreError> {
        let token = self.new_token();
        self.store.set_refresh_token(user.username(), token.clone())?;
        Ok(token)
    }

    /// Exchange an active refresh token for a new one
    ///
    /// The old value stops matching as soon as this returns.
    ///
    /// # Errors
    /// Returns `AuthError::Unauthorized` if the value is unknown or expired
    pub fn rotate(&self, value: &str) -> Result<(User, Token), AuthError> {
        let token = self.new_token();
        let user = self
            .store
            .rotate_active_refresh_token(value, unix_now(), token.clone())
            .ok_or(AuthError::Unauthorized)?;

        tracing::debug!(username = %user.username(), "Refresh token rotated");
        Ok((user, token))
    }

    /// Clear an active refresh token
    ///
    /// Returns false when there is nothing active to revoke. An expired token
    /// is reported exactly like an unknown one.
    pub fn revoke(&self, value: &str) -> bool {
        match self.store.take_active_refresh_token(value, unix_now()) {
            Some(user) => {
                tracing::debug!(username = %user.username(), "Refresh token revoked");
                true
            }
            None => false,
        }
    }
}
