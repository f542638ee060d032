//! Route definitions for the `/bookings` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET  /              list (auth, role-scoped)
/// POST /              create (client)
/// GET  /{id}          detail (auth, access-checked)
/// PUT  /{id}/status   accept/decline (owner/admin)
/// PUT  /{id}/cancel   cancel (auth, access-checked)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route("/{id}", get(booking::get_by_id))
        .route("/{id}/status", put(booking::update_status))
        .route("/{id}/cancel", put(booking::cancel))
}
