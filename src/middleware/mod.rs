/// Middleware module
///
/// Custom middleware for authentication and request tracing.

mod jwt_middleware;
mod trace_id;

pub use jwt_middleware::JwtMiddleware;
pub use trace_id::{TraceId, TraceIdMiddleware, TRACE_ID_HEADER};
