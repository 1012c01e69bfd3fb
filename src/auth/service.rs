/// Auth Facade
///
/// Composes the credential store, password hasher, access token issuer and
/// refresh token manager into the operations the HTTP layer calls.
/// Each instance owns its own store, so independent instances never share users.

use std::sync::Arc;

use crate::auth::jwt::{AccessTokenIssuer, AccessTokenValidation};
use crate::auth::models::{Tokens, User};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh_token::RefreshTokenManager;
use crate::auth::store::CredentialStore;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::validators::{is_valid_password, is_valid_username};

/// Stand-in digest checked when the username is unknown
const UNKNOWN_USER_DIGEST: [u8; 64] = [0; 64];

pub struct AuthService {
    store: Arc<CredentialStore>,
    password_key: Vec<u8>,
    access_tokens: AccessTokenIssuer,
    refresh_tokens: RefreshTokenManager,
}

impl AuthService {
    pub fn new(settings: &AuthSettings) -> Self {
        Self::with_store(settings, Arc::new(CredentialStore::new()))
    }

    pub fn with_store(settings: &AuthSettings, store: Arc<CredentialStore>) -> Self {
        let key = settings.secret_key.as_bytes();
        Self {
            password_key: key.to_vec(),
            access_tokens: AccessTokenIssuer::new(key, settings.access_token_lifetime),
            refresh_tokens: RefreshTokenManager::new(
                Arc::clone(&store),
                settings.refresh_token_lifetime,
            ),
            store,
        }
    }

    /// Register a new user
    ///
    /// # Errors
    /// - `ValidationError` for an empty or over-long username/password
    /// - `AuthError::UsernameTaken` if the username exists
    pub fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let username = is_valid_username(username)?;
        let password = is_valid_password(password)?;

        let password_hash = hash_password(password, &self.password_key)?;
        let user = self.store.register(username, password_hash).map_err(|e| {
            tracing::info!(username = %username, "Registration rejected: username taken");
            AppError::from(e)
        })?;

        tracing::info!(username = %username, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a new token pair
    ///
    /// # Errors
    /// Returns `AuthError::Unauthorized` for an unknown user, a wrong password or
    /// malformed input; the cases are not distinguished.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, AppError> {
        let user = self.verify_credentials(username, password).ok_or_else(|| {
            tracing::info!(username = %username, "Authentication failed");
            AuthError::Unauthorized
        })?;

        let refresh_token = self.refresh_tokens.issue(&user)?;
        let access_token = self.access_tokens.issue(user.username())?;

        tracing::info!(username = %user.username(), "User authenticated");
        Ok(Tokens {
            access_token,
            refresh_token,
        })
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        if is_valid_username(username).is_err() || is_valid_password(password).is_err() {
            return None;
        }
        let Ok(user) = self.store.find_by_username(username) else {
            // Unknown users pay for one keyed hash too
            let _ = verify_password(password, &UNKNOWN_USER_DIGEST, &self.password_key);
            return None;
        };
        verify_password(password, user.password_hash(), &self.password_key).then_some(user)
    }

    /// Rotate a refresh token and mint a new access token
    ///
    /// # Errors
    /// Returns `AuthError::Unauthorized` if the token is unknown, expired or
    /// already used.
    pub fn refresh(&self, refresh_token: &str) -> Result<Tokens, AppError> {
        let (user, refresh_token) = self.refresh_tokens.rotate(refresh_token).map_err(|e| {
            tracing::info!("Refresh rejected");
            e
        })?;
        let access_token = self.access_tokens.issue(user.username())?;

        tracing::info!(username = %user.username(), "Tokens refreshed");
        Ok(Tokens {
            access_token,
            refresh_token,
        })
    }

    /// Revoke a refresh token; false when nothing active matched
    pub fn revoke(&self, refresh_token: &str) -> bool {
        let revoked = self.refresh_tokens.revoke(refresh_token);
        tracing::info!(revoked = revoked, "Refresh token revocation");
        revoked
    }

    pub fn validate_access_token(&self, token: &str) -> AccessTokenValidation {
        self.access_tokens.validate_access_token(token)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::unix_now;
    use std::thread;

    fn settings() -> AuthSettings {
        AuthSettings {
            secret_key: "a70c18675573a15b6e257c15616d134f94ec437988871489bacf2ac18775311f"
                .to_string(),
            access_token_lifetime: 300,
            refresh_token_lifetime: 25200,
            secure_cookie: false,
        }
    }

    fn service() -> AuthService {
        AuthService::new(&settings())
    }

    fn assert_unauthorized<T: std::fmt::Debug>(result: Result<T, AppError>) {
        match result {
            Err(AppError::Auth(AuthError::Unauthorized)) => (),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_register_stores_keyed_hash() {
        let service = service();
        let user = service.register("alice", "s3cret").unwrap();

        let expected = hash_password("s3cret", settings().secret_key.as_bytes()).unwrap();
        assert_eq!(user.username(), "alice");
        assert_eq!(user.password_hash(), expected.as_slice());
    }

    #[test]
    fn test_register_twice_conflicts() {
        let service = service();
        let first = service.register("alice", "s3cret").unwrap();

        match service.register("alice", "other") {
            Err(AppError::Auth(AuthError::UsernameTaken)) => (),
            other => panic!("Expected UsernameTaken, got {:?}", other),
        }
        assert_eq!(service.store().find_by_username("alice").unwrap(), first);
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let service = service();

        assert!(matches!(service.register("", "s3cret"), Err(AppError::Validation(_))));
        assert!(matches!(service.register("alice", ""), Err(AppError::Validation(_))));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_authenticate_returns_tokens() {
        let service = service();
        service.register("alice", "s3cret").unwrap();
        let before = unix_now();

        let tokens = service.authenticate("alice", "s3cret").unwrap();

        assert!(tokens.access_token.expires >= before + 300);
        assert!(tokens.refresh_token.expires >= before + 25200);
        let claims = service
            .validate_access_token(&tokens.access_token.value)
            .claims()
            .expect("access token should validate");
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_authenticate_failures_are_uniform() {
        let service = service();
        service.register("alice", "s3cret").unwrap();

        assert_unauthorized(service.authenticate("alice", "wrong"));
        assert_unauthorized(service.authenticate("bob", "s3cret"));
        assert_unauthorized(service.authenticate("", ""));
    }

    #[test]
    fn test_unknown_user_digest_never_matches() {
        let key = settings().secret_key;
        for password in ["", "s3cret", "0000", "\0"] {
            assert!(!verify_password(password, &UNKNOWN_USER_DIGEST, key.as_bytes()));
        }
    }

    #[test]
    fn test_authenticate_unknown_user_after_registrations() {
        let service = service();
        service.register("alice", "s3cret").unwrap();

        assert_unauthorized(service.authenticate("bob", "s3cret"));
        assert_unauthorized(service.authenticate("bob", ""));
        assert!(service.authenticate("alice", "s3cret").is_ok());
    }

    #[test]
    fn test_authenticate_replaces_refresh_token() {
        let service = service();
        service.register("alice", "s3cret").unwrap();

        let first = service.authenticate("alice", "s3cret").unwrap();
        let second = service.authenticate("alice", "s3cret").unwrap();

        assert_unauthorized(service.refresh(&first.refresh_token.value));
        assert!(service.refresh(&second.refresh_token.value).is_ok());
    }

    #[test]
    fn test_full_token_lifecycle() {
        let service = service();
        service.register("alice", "s3cret").unwrap();

        let r1 = service.authenticate("alice", "s3cret").unwrap().refresh_token;

        let refreshed = service.refresh(&r1.value).unwrap();
        let r2 = refreshed.refresh_token;
        assert_ne!(r2.value, r1.value);
        assert!(service.validate_access_token(&refreshed.access_token.value).is_valid());

        // Reuse after rotation
        assert_unauthorized(service.refresh(&r1.value));

        assert!(service.revoke(&r2.value));
        assert!(!service.revoke(&r2.value));
        assert_unauthorized(service.refresh(&r2.value));
    }

    #[test]
    fn test_refresh_with_garbage() {
        let service = service();
        assert_unauthorized(service.refresh("token"));
        assert!(!service.revoke("token"));
    }

    #[test]
    fn test_expired_refresh_token() {
        let mut expired = settings();
        expired.refresh_token_lifetime = -1;
        let service = AuthService::new(&expired);
        service.register("alice", "s3cret").unwrap();

        let tokens = service.authenticate("alice", "s3cret").unwrap();

        assert_unauthorized(service.refresh(&tokens.refresh_token.value));
        assert!(!service.revoke(&tokens.refresh_token.value));
    }

    #[test]
    fn test_services_do_not_share_users() {
        let first = service();
        let second = service();
        first.register("alice", "s3cret").unwrap();

        assert_unauthorized(second.authenticate("alice", "s3cret"));
    }

    #[test]
    fn test_parallel_registration() {
        let service = service();
        let workers = 16;

        let successes = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| scope.spawn(|| service.register("alice", "s3cret").is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("worker panicked"))
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
    }
}
