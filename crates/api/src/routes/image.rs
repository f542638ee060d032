//! Route definitions for the standalone `/images` endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::image;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// POST /upload    single image upload (auth)
/// GET  /optimize  passthrough (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(image::upload))
        .route("/optimize", get(image::optimize))
}
