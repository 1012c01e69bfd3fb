use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::configuration::AuthSettings;
use crate::middleware::{JwtMiddleware, TraceIdMiddleware};
use crate::routes::{authenticate, check, health_check, refresh, register, revoke};

pub fn run(
    listener: TcpListener,
    auth: Arc<AuthService>,
    auth_settings: AuthSettings,
) -> Result<Server, std::io::Error> {
    let auth_data = web::Data::from(Arc::clone(&auth));
    let settings_data = web::Data::new(auth_settings);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(TraceIdMiddleware)

            // Shared state
            .app_data(auth_data.clone())
            .app_data(settings_data.clone())

            // Public routes
            .route("/health", web::get().to(health_check))
            .route("/auth", web::post().to(authenticate))
            .route("/auth/register", web::post().to(register))
            .route("/auth/refresh", web::post().to(refresh))
            .route("/auth/revoke", web::post().to(revoke))

            // Protected routes (require a valid access token)
            .service(
                web::resource("/auth/check")
                    .wrap(JwtMiddleware::new(Arc::clone(&auth)))
                    .route(web::get().to(check)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
