/// JWT Authentication Middleware
///
/// Validates the access token from the Authorization header and injects
/// claims into request extensions for use by route handlers.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::{AccessTokenValidation, AuthService};
use crate::error::{AppError, AuthError};
use crate::middleware::TraceId;

/// JWT middleware for protecting routes
///
/// Every failure (missing header, wrong scheme, bad or expired token) is
/// answered with the same 401 response. Rejections are returned as responses,
/// not errors, so outer middleware still sees and tags them.
pub struct JwtMiddleware {
    auth: Arc<AuthService>,
}

impl JwtMiddleware {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            auth: Arc::clone(&self.auth),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    auth: Arc<AuthService>,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

fn reject<B>(req: ServiceRequest, error: AuthError) -> ServiceResponse<EitherBody<B>> {
    let response = ResponseError::error_response(&AppError::Auth(error));
    req.into_response(response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();

        let Some(token) = bearer_token(&req) else {
            tracing::info!(trace_id = %trace_id, "Missing or invalid Authorization header");
            let res = reject(req, AuthError::MissingToken);
            return Box::pin(async move { Ok(res) });
        };

        match self.auth.validate_access_token(&token) {
            AccessTokenValidation::Valid(claims) => {
                tracing::debug!(trace_id = %trace_id, username = %claims.sub, "JWT validated successfully");
                req.extensions_mut().insert(claims);

                let service = Rc::clone(&self.service);
                Box::pin(async move { service.call(req).await.map(ServiceResponse::map_into_left_body) })
            }
            AccessTokenValidation::Invalid => {
                tracing::info!(trace_id = %trace_id, "Access token rejected");
                let res = reject(req, AuthError::Unauthorized);
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
