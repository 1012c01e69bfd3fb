/// JWT Token Generation and Validation
///
/// Access tokens are HS512-signed JWTs keyed by the deployment secret.
/// Validation failures are never distinguished to the caller: a malformed
/// string, a bad signature and an expired token all come back as `Invalid`.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::auth::models::Token;
use crate::auth::unix_now;
use crate::error::AppError;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Outcome of access token validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessTokenValidation {
    Valid(Claims),
    Invalid,
}

impl AccessTokenValidation {
    pub fn claims(self) -> Option<Claims> {
        match self {
            AccessTokenValidation::Valid(claims) => Some(claims),
            AccessTokenValidation::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, AccessTokenValidation::Valid(_))
    }
}

/// Creates and validates access tokens with a fixed key and default lifetime
pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: i64,
}

impl AccessTokenIssuer {
    /// # Arguments
    /// * `secret` - Deployment secret used as the HMAC key
    /// * `lifetime` - Default access token lifetime in seconds
    pub fn new(secret: &[u8], lifetime: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // No issuer or audience checks, no clock skew
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    /// Create an access token with the configured lifetime
    pub fn issue(&self, username: &str) -> Result<Token, AppError> {
        self.create_access_token(username, self.lifetime)
    }

    /// Create an access token for `username` expiring `lifetime_seconds` from now
    ///
    /// The returned `Token` carries the expiry separately so callers can
    /// schedule a refresh without decoding the JWT.
    ///
    /// # Errors
    /// Returns error if signing fails
    pub fn create_access_token(&self, username: &str, lifetime_seconds: i64) -> Result<Token, AppError> {
        let claims = Claims::new(username, lifetime_seconds, unix_now());

        let value = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(Token::new(value, claims.exp))
    }

    /// Validate an access token and extract its claims
    pub fn validate_access_token(&self, token: &str) -> AccessTokenValidation {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                return AccessTokenValidation::Invalid;
            }
        };

        // jsonwebtoken accepts exp == now; expiry here is strict
        if claims.is_expired_at(unix_now()) {
            tracing::debug!("Access token rejected: expired");
            return AccessTokenValidation::Invalid;
        }

        AccessTokenValidation::Valid(claims)
    }
}
