//! Health check endpoint, mounted at the root (outside `/api` and exempt
//! from rate limiting).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Reports process liveness plus database and cache reachability. The cache
/// being down does not fail the check; the database being down does.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let db_ok = sejour_db::health_check(&state.pool).await.is_ok();
    let cache_enabled = state.cache.is_enabled();

    let status = if db_ok { "ok" } else { "degraded" };
    let code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": status,
            "database": db_ok,
            "cache": cache_enabled,
        })),
    )
}
