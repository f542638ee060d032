//! Repository for the `messages` table.

use sqlx::PgPool;

use sejour_core::types::DbId;

use crate::models::message::{CreateMessage, Message, MessageSenderRow, MessageWithSender};

const COLUMNS: &str = "id, conversation_id, sender_id, content, is_read, message_type, \
     file_url, file_name, file_size, created_at";

const JOINED_COLUMNS: &str = "m.id, m.conversation_id, m.sender_id, m.content, m.is_read, \
     m.message_type, m.file_url, m.file_name, m.file_size, m.created_at, \
     u.full_name AS sender_full_name, u.email AS sender_email";

/// Provides message persistence, pagination, and read/unread bookkeeping.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message and bump the conversation's `last_message_at`.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages
                (conversation_id, sender_id, content, message_type, file_url, file_name, file_size)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(input.conversation_id)
            .bind(input.sender_id)
            .bind(&input.content)
            .bind(&input.message_type)
            .bind(&input.file_url)
            .bind(&input.file_name)
            .bind(input.file_size)
            .fetch_one(pool)
            .await?;

        sqlx::query(
            "UPDATE conversations SET last_message_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(input.conversation_id)
        .execute(pool)
        .await?;

        Ok(message)
    }

    /// One page of messages with sender info, newest first. Callers reverse
    /// the page for chronological display.
    pub async fn list_page(
        pool: &PgPool,
        conversation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM messages m
             JOIN users u ON u.id = m.sender_id
             WHERE m.conversation_id = $1
             ORDER BY m.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, MessageSenderRow>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of messages in a conversation.
    pub async fn count(pool: &PgPool, conversation_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
            .bind(conversation_id)
            .fetch_one(pool)
            .await
    }

    /// Most recent message in a conversation with its sender, if any.
    pub async fn last_message(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Option<MessageWithSender>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM messages m
             JOIN users u ON u.id = m.sender_id
             WHERE m.conversation_id = $1
             ORDER BY m.created_at DESC
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, MessageSenderRow>(&query)
            .bind(conversation_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a message read. Returns `true` if a row changed.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unread messages in a conversation not sent by `user_id`, counted
    /// fresh on every call.
    pub async fn unread_count(
        pool: &PgPool,
        conversation_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages
             WHERE conversation_id = $1 AND is_read = FALSE AND sender_id <> $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
