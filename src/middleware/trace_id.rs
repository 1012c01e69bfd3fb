use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Instant;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Trace id attached to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Tags each request with a trace id and logs its start and completion.
///
/// An incoming `X-Trace-Id` header is kept as is; otherwise a UUID v4 is
/// generated and echoed back in the response header.
pub struct TraceIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TraceIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceIdMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(TraceIdMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct TraceIdMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TraceIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let incoming = req
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let generated = incoming.is_none();
        let trace_id = incoming.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        req.extensions_mut().insert(TraceId(trace_id.clone()));
        tracing::info!(trace_id = %trace_id, method = %method, path = %path, "Request started");

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let mut res = service.call(req).await?;

            if generated {
                if let Ok(value) = HeaderValue::from_str(&trace_id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
            }

            tracing::info!(
                trace_id = %trace_id,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request completed"
            );

            Ok(res)
        })
    }
}
