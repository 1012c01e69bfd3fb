/// Authentication module
///
/// Credential storage, password hashing, access token issuance/validation
/// and refresh token rotation, composed by `AuthService`.

mod claims;
mod jwt;
mod models;
mod password;
mod refresh_token;
mod service;
mod store;

pub use claims::Claims;
pub use jwt::{AccessTokenIssuer, AccessTokenValidation};
pub use models::{Token, Tokens, User};
pub use password::{hash_password, verify_password};
pub use refresh_token::{generate_refresh_token, RefreshTokenManager};
pub use service::AuthService;
pub use store::CredentialStore;

/// Current time as Unix seconds
pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
