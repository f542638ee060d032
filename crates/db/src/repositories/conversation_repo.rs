//! Repository for the `conversations` table.

use sqlx::PgPool;

use sejour_core::roles::{ROLE_CLIENT, ROLE_OWNER};
use sejour_core::types::DbId;

use crate::models::conversation::{Conversation, ConversationDetailRow};

const COLUMNS: &str =
    "id, booking_id, client_id, owner_id, last_message_at, created_at, updated_at";

/// Join selecting a conversation plus both participants and the booking's
/// property context.
const DETAIL_COLUMNS: &str = "c.id, c.booking_id, c.client_id, c.owner_id, c.last_message_at, \
     c.created_at, c.updated_at, \
     uc.full_name AS client_full_name, uc.email AS client_email, \
     uo.full_name AS owner_full_name, uo.email AS owner_email, \
     p.title AS property_title, b.start_date AS booking_start_date";

const DETAIL_FROM: &str = "FROM conversations c
     JOIN users uc ON uc.id = c.client_id
     JOIN users uo ON uo.id = c.owner_id
     JOIN bookings b ON b.id = c.booking_id
     JOIN properties p ON p.id = b.property_id";

/// Provides conversation persistence. One conversation per booking, enforced
/// by `uq_conversations_booking`.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Insert the conversation for a booking.
    ///
    /// A unique violation means another request created it first; callers
    /// should re-read via [`ConversationRepo::find_by_booking`].
    pub async fn create(
        pool: &PgPool,
        booking_id: DbId,
        client_id: DbId,
        owner_id: DbId,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (booking_id, client_id, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(booking_id)
            .bind(client_id)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE booking_id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// Detail row (participants + property context) for one conversation.
    pub async fn detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConversationDetailRow>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE c.id = $1");
        sqlx::query_as::<_, ConversationDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page of detail rows visible to `user_id` given their role: clients
    /// see their client-side conversations, owners their owner side, anyone
    /// else (admin) sees all. Ordered by most recent activity.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ConversationDetailRow>, sqlx::Error> {
        let filter = match role {
            ROLE_CLIENT => "WHERE c.client_id = $1",
            ROLE_OWNER => "WHERE c.owner_id = $1",
            _ => "WHERE $1 = $1",
        };
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             {filter}
             ORDER BY c.last_message_at DESC NULLS LAST, c.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ConversationDetailRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Bump `last_message_at` after a message insert.
    pub async fn touch_last_message(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE conversations SET last_message_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
