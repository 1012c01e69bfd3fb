//! Integration tests for the tokenvault server

use std::net::TcpListener;
use std::sync::Arc;

use tokenvault::auth::AuthService;
use tokenvault::configuration::AuthSettings;
use tokenvault::startup::run;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let settings = AuthSettings {
        secret_key: "health-check-secret".to_string(),
        access_token_lifetime: 300,
        refresh_token_lifetime: 25200,
        secure_cookie: false,
    };
    let auth = Arc::new(AuthService::new(&settings));
    let server = run(listener, auth, settings)
        .expect("Failed to create server");

    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Healthy");
}

#[tokio::test]
async fn trace_id_is_generated_when_missing() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health", addr))
        .send()
        .await
        .expect("Failed to execute request");

    let trace_id = response
        .headers()
        .get("X-Trace-Id")
        .expect("Missing trace id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());
}

#[tokio::test]
async fn incoming_trace_id_is_not_overwritten() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health", addr))
        .header("X-Trace-Id", "caller-supplied")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers().get("X-Trace-Id").is_none());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/nope", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn trace_id_is_set_on_rejected_protected_route() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/auth/check", addr))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
    let trace_id = response
        .headers()
        .get("X-Trace-Id")
        .expect("Missing trace id header on rejected request")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());
}

#[tokio::test]
async fn trace_id_is_set_when_authorization_header_is_missing() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/auth/check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
    assert!(response.headers().get("X-Trace-Id").is_some());
}
