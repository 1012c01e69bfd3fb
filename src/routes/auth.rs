/// Authentication Routes
///
/// Registration, authentication, refresh-token rotation and revocation.
/// The refresh token travels in an http-only cookie; access tokens are
/// returned in the response body as `{ value, expires }`.

use actix_web::cookie::{time::OffsetDateTime, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthService, Claims, Token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "Bearer";

/// Registration and authentication request
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
}

fn refresh_cookie(token: &Token, secure: bool) -> Result<Cookie<'static>, AppError> {
    let expires = OffsetDateTime::from_unix_timestamp(token.expires)
        .map_err(|e| AppError::Internal(format!("Refresh token expiry out of range: {}", e)))?;

    Ok(Cookie::build(REFRESH_COOKIE, token.value.clone())
        .path("/")
        .http_only(true)
        .secure(secure)
        .expires(expires)
        .finish())
}

fn refresh_token_from(req: &HttpRequest) -> Result<String, AppError> {
    req.cookie(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            tracing::info!("Refresh token cookie not found");
            AppError::Auth(AuthError::MissingToken)
        })
}

/// POST /auth/register
///
/// # Errors
/// - 400: Empty or over-long username/password
/// - 409: Username already registered
pub async fn register(
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = auth.register(&form.username, &form.password)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        username: user.username().to_string(),
    }))
}

/// POST /auth
///
/// Returns the access token and sets the refresh token cookie.
///
/// # Errors
/// - 401: Unknown user or wrong password (indistinguishable)
pub async fn authenticate(
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
    settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let tokens = auth.authenticate(&form.username, &form.password)?;
    let cookie = refresh_cookie(&tokens.refresh_token, settings.secure_cookie)?;

    Ok(HttpResponse::Ok().cookie(cookie).json(tokens.access_token))
}

/// POST /auth/refresh
///
/// Rotates the refresh token from the cookie and returns a new access token.
/// The old refresh token is unusable afterwards.
///
/// # Errors
/// - 401: Cookie missing, or token unknown, expired or already used
pub async fn refresh(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = refresh_token_from(&req)?;
    let tokens = auth.refresh(&refresh_token)?;
    let cookie = refresh_cookie(&tokens.refresh_token, settings.secure_cookie)?;

    Ok(HttpResponse::Ok().cookie(cookie).json(tokens.access_token))
}

/// POST /auth/revoke
///
/// # Errors
/// - 401: Cookie missing
/// - 404: No active refresh token matched (unknown and expired look the same)
pub async fn revoke(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = refresh_token_from(&req)?;

    if !auth.revoke(&refresh_token) {
        return Err(AppError::Auth(AuthError::RefreshTokenNotFound));
    }

    let mut removal = Cookie::build(REFRESH_COOKIE, "").path("/").finish();
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).finish())
}

/// GET /auth/check
///
/// **Requires a valid access token**: `Authorization: Bearer <access_token>`.
pub async fn check(claims: web::ReqData<Claims>) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse {
        username: claims.username().to_string(),
    })
}
