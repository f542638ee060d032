//! HTTP-level integration tests for the `/api/bookings` lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, error_body, get_auth, post_json_auth, put_json_auth, seed_property, seed_user,
};
use sqlx::PgPool;

async fn create_booking(
    app: axum::Router,
    token: &str,
    property_id: &str,
    start: &str,
    end: &str,
) -> axum::response::Response {
    let body = serde_json::json!({
        "property_id": property_id,
        "start_date": start,
        "end_date": end,
        "guests": 2,
    });
    post_json_auth(app, "/api/bookings", body, token).await
}

/// A valid booking is inserted as pending with computed nights and price.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_computes_nights_and_price(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await; // 100 per night
    let app = common::build_test_app(pool);

    let response = create_booking(
        app,
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["nights"], 3);
    assert_eq!(json["data"]["total_price"], 300.0);
}

/// Booking creation posts the French pending system message into the
/// booking's conversation (asynchronously).
#[sqlx::test(migrations = "../db/migrations")]
async fn create_posts_pending_system_message(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool.clone());

    let response = create_booking(
        app,
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The message task is detached; poll briefly for it.
    let mut content: Option<String> = None;
    for _ in 0..50 {
        content = sqlx::query_scalar(
            "SELECT content FROM messages WHERE message_type = 'system' LIMIT 1",
        )
        .fetch_optional(&pool)
        .await
        .unwrap();
        if content.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    let content = content.expect("system message should appear");
    assert_eq!(
        content,
        format!(
            "Une nouvelle réservation pour \"{}\" a été créée et est en attente de confirmation.",
            property.title
        )
    );
}

/// Dates touching an active booking are rejected, including a stay that
/// starts on an existing stay's checkout day. The next free start date is
/// the day after the existing end date.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_overlap_including_endpoints(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, token_a) = seed_user(&pool, "a@example.fr", "client").await;
    let (_, token_b) = seed_user(&pool, "b@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);
    let pid = property.id.to_string();

    let response = create_booking(app.clone(), &token_a, &pid, "2031-07-01", "2031-07-05").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Sharing a night conflicts.
    let response = create_booking(app.clone(), &token_b, &pid, "2031-07-04", "2031-07-08").await;
    let error = error_body(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["code"], "BUSINESS_RULE");

    // Starting on the existing checkout day conflicts too.
    let response = create_booking(app.clone(), &token_b, &pid, "2031-07-05", "2031-07-08").await;
    let error = error_body(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["code"], "BUSINESS_RULE");

    // The day after the checkout is free.
    let response = create_booking(app, &token_b, &pid, "2031-07-06", "2031-07-09").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Blocked dates make the range unavailable.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_blocked_dates(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/properties/{}/blocked-dates", property.id),
        serde_json::json!({ "dates": ["2031-07-02"] }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_booking(
        app,
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    let error = error_body(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["code"], "BUSINESS_RULE");
}

/// Guests and date validation happen before any availability check.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_validates_guests_and_dates(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);
    let pid = property.id.to_string();

    let zero_guests = serde_json::json!({
        "property_id": pid,
        "start_date": "2031-07-01",
        "end_date": "2031-07-04",
        "guests": 0,
    });
    let response = post_json_auth(app.clone(), "/api/bookings", zero_guests, &client_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Start in the past.
    let response = create_booking(app.clone(), &client_token, &pid, "2020-01-01", "2020-01-05").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // End before start.
    let response = create_booking(app, &client_token, &pid, "2031-07-04", "2031-07-01").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Owners cannot book; only clients can.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_requires_client_role(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "owner@example.fr", "owner").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app,
        &owner_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The property owner accepts a pending booking; a second decision on the
/// same booking is an illegal transition.
#[sqlx::test(migrations = "../db/migrations")]
async fn owner_accepts_then_cannot_redecide(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app.clone(),
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    let booking_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/bookings/{booking_id}/status");
    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "status": "accepted" }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "accepted");

    let response = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "status": "declined" }),
        &owner_token,
    )
    .await;
    let error = error_body(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["code"], "BUSINESS_RULE");
}

/// Only the property's owner (or an admin) decides, and only to
/// accepted/declined.
#[sqlx::test(migrations = "../db/migrations")]
async fn status_update_is_owner_scoped_and_restricted(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, stranger_token) = seed_user(&pool, "autre@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app.clone(),
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    let booking_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/bookings/{booking_id}/status");

    // Another owner is not allowed.
    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "status": "accepted" }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Cancelling through the decision endpoint is not allowed.
    let response = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "status": "cancelled" }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Clients cancel their own pending booking, but not an accepted one.
#[sqlx::test(migrations = "../db/migrations")]
async fn client_cancels_only_while_pending(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app.clone(),
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    let booking_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Accept it, then the client may no longer cancel.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/bookings/{booking_id}/status"),
        serde_json::json!({ "status": "accepted" }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/bookings/{booking_id}/cancel"),
        serde_json::json!({}),
        &client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The owner still can cancel an accepted booking on their property.
    let response = put_json_auth(
        app,
        &format!("/api/bookings/{booking_id}/cancel"),
        serde_json::json!({}),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "cancelled");
}

/// Listing is role-scoped, and rows embed the property summary.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_role_scoped(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let (_, other_client_token) = seed_user(&pool, "autre@example.fr", "client").await;
    let (_, admin_token) = seed_user(&pool, "admin@example.fr", "admin").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app.clone(),
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(app.clone(), "/api/bookings", &client_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["property"]["city"], "Paris");

    let json = body_json(get_auth(app.clone(), "/api/bookings", &other_client_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let json = body_json(get_auth(app.clone(), "/api/bookings", &owner_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(get_auth(app, "/api/bookings", &admin_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// A client unrelated to the booking cannot read it.
#[sqlx::test(migrations = "../db/migrations")]
async fn detail_access_is_checked(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "owner@example.fr", "owner").await;
    let (_, client_token) = seed_user(&pool, "client@example.fr", "client").await;
    let (_, other_token) = seed_user(&pool, "autre@example.fr", "client").await;
    let property = seed_property(&pool, owner.id, "Paris").await;
    let app = common::build_test_app(pool);

    let response = create_booking(
        app.clone(),
        &client_token,
        &property.id.to_string(),
        "2031-07-01",
        "2031-07-04",
    )
    .await;
    let booking_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/bookings/{booking_id}");
    let response = get_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &uri, &client_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
