//! Route tree assembly.
//!
//! Each resource contributes a sub-router; `api_routes` nests them under
//! `/api` with per-group rate limits. `/health` lives outside `/api` and is
//! never rate limited.

pub mod auth;
pub mod booking;
pub mod chat;
pub mod health;
pub mod image;
pub mod property;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/*           register, login, me, logout       (5 / 15 min)
/// /properties/*     directory + blocked dates         (30 / min)
/// /bookings/*       booking lifecycle                 (100 / 15 min)
/// /conversations/*  chat                              (100 / 15 min)
/// /messages/*       read receipts                     (100 / 15 min)
/// /images/*         generic upload, optimize          (10 / hour)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let limits = &config.rate_limits;

    let auth_routes = limited(
        auth::router(),
        config,
        15 * 60,
        limits.auth_per_15_min,
    );
    let property_routes = limited(property::router(), config, 60, limits.search_per_min);
    let image_routes = limited(image::router(), config, 60 * 60, limits.image_per_hour);
    let general = limited(
        Router::new()
            .nest("/bookings", booking::router())
            .nest("/conversations", chat::conversations_router())
            .nest("/messages", chat::messages_router()),
        config,
        15 * 60,
        limits.general_per_15_min,
    );

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/properties", property_routes)
        .nest("/images", image_routes)
        .merge(general)
}

/// Wrap a sub-router with a per-IP rate limit of `max` requests per
/// `window_secs`, replenishing evenly across the window.
fn limited(
    router: Router<AppState>,
    config: &ServerConfig,
    window_secs: u64,
    max: u32,
) -> Router<AppState> {
    if !config.rate_limiting_enabled {
        return router;
    }

    let period = Duration::from_secs(window_secs) / max.max(1);
    let governor = Arc::new(
        GovernorConfigBuilder::default()
            .period(period)
            .burst_size(max.max(1))
            .finish()
            .expect("rate limit configuration must be valid"),
    );

    router.layer(GovernorLayer { config: governor })
}
