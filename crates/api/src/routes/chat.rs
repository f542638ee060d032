//! Route definitions for the `/conversations` and `/messages` resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Conversation routes mounted at `/conversations`.
///
/// ```text
/// GET  /                       list (auth, cached per user)
/// POST /                       create-or-return for a booking (auth)
/// GET  /{id}                   detail (participant/admin)
/// GET  /{id}/messages          message page (participant/admin)
/// POST /{id}/messages          send message (participant/admin)
/// GET  /{id}/unread-count      fresh unread count (participant/admin)
/// POST /{id}/upload-file       attach a file (participant/admin)
/// ```
pub fn conversations_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(chat::list_conversations).post(chat::create_conversation),
        )
        .route("/{id}", get(chat::get_conversation))
        .route(
            "/{id}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/{id}/unread-count", get(chat::unread_count))
        .route("/{id}/upload-file", post(chat::upload_file))
}

/// Message routes mounted at `/messages`.
pub fn messages_router() -> Router<AppState> {
    Router::new().route("/{id}/read", put(chat::mark_message_read))
}
