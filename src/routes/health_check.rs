use actix_web::HttpResponse;

/// GET /health
pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health probe");
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Healthy")
}
