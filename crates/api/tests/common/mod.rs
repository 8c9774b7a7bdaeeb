//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use hvacdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use hvacdesk_api::config::ServerConfig;
use hvacdesk_api::router::build_app_router;
use hvacdesk_api::state::AppState;
use hvacdesk_core::roles::ROLE_STAFF;
use hvacdesk_db::models::service::{CreateService, Service};
use hvacdesk_db::models::staff::{CreateStaffMember, StaffMember};
use hvacdesk_db::repositories::{ServiceRepo, StaffRepo};
use hvacdesk_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router against `pool`, returning the bus so
/// tests can observe published lifecycle events.
pub fn build_test_app_with_bus(pool: PgPool) -> (Router, Arc<EventBus>) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    (build_app_router(state, &config), event_bus)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool).0
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_service(pool: &PgPool) -> Service {
    ServiceRepo::create(
        pool,
        &CreateService {
            name: "AC Repair".to_string(),
            slug: "ac-repair".to_string(),
            summary: "Diagnosis and repair of split and window units".to_string(),
            base_price_min: None,
            base_price_max: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_staff(pool: &PgPool, name: &str) -> StaffMember {
    StaffRepo::create(
        pool,
        &CreateStaffMember {
            name: name.to_string(),
            email: format!("{}@globalcool-light.com", name.to_lowercase().replace(' ', ".")),
        },
    )
    .await
    .unwrap()
}

/// Token for a staff member with the given role.
pub fn token_for(staff: &StaffMember, role: &str) -> String {
    generate_access_token(staff.id, &staff.name, role, &test_config().jwt).unwrap()
}

/// Seed a staff member and return their `staff` token.
pub async fn staff_token(pool: &PgPool) -> String {
    let staff = seed_staff(pool, "Grace Wanjiru").await;
    token_for(&staff, ROLE_STAFF)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
