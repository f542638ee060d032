//! Route definitions for the `/properties` resource, including the
//! per-property blocked-date ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::{availability, property};
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /                          search (public, cached)
/// POST   /                          create (owner/admin, multipart)
/// GET    /owner/{owner_id}          list by owner (auth)
/// GET    /{id}                      detail (public, cached)
/// PUT    /{id}                      update (owner/admin)
/// DELETE /{id}                      delete (owner/admin)
/// GET    /{id}/bookings             active bookings (public)
/// GET    /{id}/blocked-dates        list blocked dates (auth)
/// POST   /{id}/blocked-dates        block dates (owner/admin)
/// DELETE /{id}/blocked-dates        unblock dates (owner/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list).post(property::create))
        .route("/owner/{owner_id}", get(property::list_by_owner))
        .route(
            "/{id}",
            get(property::get_by_id)
                .put(property::update)
                .delete(property::delete),
        )
        .route("/{id}/bookings", get(property::active_bookings))
        .route(
            "/{id}/blocked-dates",
            get(availability::list)
                .post(availability::add)
                .delete(availability::remove),
        )
}
