//! Fire-and-forget side effects triggered by booking transitions.
//!
//! A booking create or status change posts a French system message into the
//! booking's conversation (creating the conversation on first use). These
//! tasks run detached from the request: a Redis or Postgres hiccup here must
//! never fail the booking itself, so every error stops at a `warn` log.

use sejour_core::booking::BookingStatus;
use sejour_core::chat::{system_message_for_status, MessageType, SystemSender};
use sejour_db::models::message::CreateMessage;
use sejour_db::models::booking::Booking;
use sejour_db::repositories::{ConversationRepo, MessageRepo, PropertyRepo};

use crate::state::AppState;

/// Spawn a detached task posting the system message for `status` into the
/// booking's conversation.
pub fn booking_status_changed(state: &AppState, booking: Booking, status: BookingStatus) {
    let state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = post_system_message(&state, &booking, status).await {
            tracing::warn!(
                booking_id = %booking.id,
                status = status.as_str(),
                error = %e,
                "Failed to post booking system message"
            );
        }
    });
}

async fn post_system_message(
    state: &AppState,
    booking: &Booking,
    status: BookingStatus,
) -> Result<(), sqlx::Error> {
    let property = PropertyRepo::find_by_id(&state.pool, booking.property_id).await?;
    let (title, owner_id) = match &property {
        Some(p) => (Some(p.title.as_str()), Some(p.owner_id)),
        None => (None, None),
    };

    // Reuse the booking's conversation or create it. A concurrent create
    // loses the unique race; fall back to re-reading.
    let conversation = match ConversationRepo::find_by_booking(&state.pool, booking.id).await? {
        Some(c) => c,
        None => {
            let Some(owner_id) = owner_id else {
                // Property gone; nowhere to attach the conversation.
                return Ok(());
            };
            match ConversationRepo::create(&state.pool, booking.id, booking.client_id, owner_id)
                .await
            {
                Ok(c) => c,
                Err(sqlx::Error::Database(db_err))
                    if db_err.constraint() == Some("uq_conversations_booking") =>
                {
                    match ConversationRepo::find_by_booking(&state.pool, booking.id).await? {
                        Some(c) => c,
                        None => return Ok(()),
                    }
                }
                Err(e) => return Err(e),
            }
        }
    };

    let (content, sender) = system_message_for_status(status, title);
    let sender_id = match sender {
        SystemSender::Client => conversation.client_id,
        SystemSender::Owner => conversation.owner_id,
    };

    MessageRepo::create(
        &state.pool,
        &CreateMessage {
            conversation_id: conversation.id,
            sender_id,
            content,
            message_type: MessageType::System.as_str().to_string(),
            file_url: None,
            file_name: None,
            file_size: None,
        },
    )
    .await?;

    // Both participants' cached conversation lists are now stale.
    state
        .cache
        .invalidate_conversations(&conversation.client_id.to_string())
        .await;
    state
        .cache
        .invalidate_conversations(&conversation.owner_id.to_string())
        .await;

    Ok(())
}
