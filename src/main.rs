use std::net::TcpListener;
use std::sync::Arc;

use tokenvault::auth::AuthService;
use tokenvault::configuration::get_configuration;
use tokenvault::startup::run;
use tokenvault::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = init_telemetry() {
        eprintln!("Failed to initialize telemetry: {}", e);
    }

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if let Err(e) = configuration.auth.validate() {
        tracing::error!("Invalid auth configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Configuration error",
        ));
    }
    tracing::info!(
        access_token_lifetime = configuration.auth.access_token_lifetime,
        refresh_token_lifetime = configuration.auth.refresh_token_lifetime,
        secure_cookie = configuration.auth.secure_cookie,
        "Configuration loaded successfully"
    );

    let auth = Arc::new(AuthService::new(&configuration.auth));

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, auth, configuration.auth.clone())?;
    server.await
}
