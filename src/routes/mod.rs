mod auth;
mod health_check;

pub use auth::{authenticate, check, refresh, register, revoke, CredentialsRequest, REFRESH_COOKIE};
pub use health_check::health_check;
