#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};

use listify::auth::{AuthMiddleware, PasswordHasher, Session, SessionIssuer};
use listify::routes::{self, health};
use listify::store::MemoryCredentialStore;
use listify::AppState;

pub const SECRET: &str = "integration-test-secret";

pub fn issuer() -> SessionIssuer {
    SessionIssuer::new(SECRET, Duration::hours(1))
}

/// Builds the app the way `main` does, over a fresh in-memory store.
pub async fn spawn_app() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    Arc<MemoryCredentialStore>,
) {
    let store = Arc::new(MemoryCredentialStore::new());
    let state = web::Data::new(AppState::new(
        store.clone(),
        PasswordHasher::new(4),
        issuer(),
    ));

    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    (app, store)
}

pub fn scout_payload(email: &str) -> Value {
    json!({
        "email": email,
        "name": "A",
        "password": "Passw0rd!",
        "role": "SCOUT",
        "shopName": "Cuts"
    })
}

pub fn talent_payload(email: &str) -> Value {
    json!({
        "email": email,
        "name": "Tess",
        "password": "Passw0rd!",
        "role": "TALENT",
        "occupations": ["BARBER", "TATTOO_ARTIST"],
        "bio": "Fades and fine line"
    })
}

pub fn register_request(payload: &Value) -> Request {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(payload)
        .to_request()
}

pub fn login_request(email: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request()
}

/// Registers and signs in, returning the bearer token.
pub async fn register_and_login<S, B>(app: &S, payload: &Value) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, register_request(payload)).await;
    assert!(resp.status().is_success(), "registration failed: {}", resp.status());

    let email = payload["email"].as_str().unwrap();
    let password = payload["password"].as_str().unwrap();
    let body: Value = test::call_and_read_body_json(app, login_request(email, password)).await;
    body["token"].as_str().unwrap().to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn decode(token: &str) -> Session {
    issuer().verify(token).unwrap()
}
