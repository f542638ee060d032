//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack (CORS, request ID, timeout, panic
//! recovery) that production uses. Rate limiting is off: test requests
//! carry no peer address to key on. The cache is disabled, which per the
//! cache contract must be behaviorally identical to a cold cache.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sejour_api::auth::jwt::{generate_token, JwtConfig};
use sejour_api::auth::password::hash_password;
use sejour_api::config::{RateLimits, ServerConfig};
use sejour_api::router::build_app_router;
use sejour_api::state::AppState;
use sejour_cache::Cache;
use sejour_db::models::property::CreateProperty;
use sejour_db::models::user::{CreateUser, User};
use sejour_db::repositories::{PropertyRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            expiry_hours: 24,
        },
        rate_limits: RateLimits::default(),
        rate_limiting_enabled: false,
    }
}

/// Build the full application router against the given pool, with the cache
/// disabled and no object storage.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        cache: Arc::new(Cache::disabled()),
        store: None,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, "POST", uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    json_request(app, "POST", uri, body, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    json_request(app, "PUT", uri, body, Some(token)).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    json_request(app, "DELETE", uri, body, Some(token)).await
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus a valid
/// bearer token for it.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let hashed = hash_password("test_password_123!").expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("Test {role}"),
            email: email.to_string(),
            phone: None,
            password_hash: hashed,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_token(user.id, &user.email, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create a property owned by `owner_id` with a fixed nightly rate of 100.
pub async fn seed_property(
    pool: &PgPool,
    owner_id: sejour_core::types::DbId,
    city: &str,
) -> sejour_db::models::property::Property {
    PropertyRepo::create(
        pool,
        owner_id,
        &CreateProperty {
            title: format!("Appartement {city}"),
            description: Some("Deux pièces lumineux".to_string()),
            property_type: "apartment".to_string(),
            furnished: Some(true),
            price_per_night: 100.0,
            address: "1 rue de la Paix".to_string(),
            city: city.to_string(),
            latitude: None,
            longitude: None,
            room_count: Some(2),
            amenities: Some(vec!["wifi".to_string()]),
        },
        &[],
    )
    .await
    .expect("property creation should succeed")
}

/// Assert the uniform error envelope and return its inner `error` object.
pub async fn error_body(response: Response, expected: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), expected);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["statusCode"], expected.as_u16());
    json["error"].clone()
}
