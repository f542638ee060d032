//! Message entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use sejour_core::types::{DbId, Timestamp};

use crate::models::user::Participant;

/// A message row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub conversation_id: DbId,
    pub sender_id: DbId,
    pub content: String,
    pub is_read: bool,
    pub message_type: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: Timestamp,
}

/// DTO for inserting a message. Content is already validated/trimmed.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub conversation_id: DbId,
    pub sender_id: DbId,
    pub content: String,
    pub message_type: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

/// Flat join row: message + sender identity.
#[derive(Debug, Clone, FromRow)]
pub struct MessageSenderRow {
    pub id: DbId,
    pub conversation_id: DbId,
    pub sender_id: DbId,
    pub content: String,
    pub is_read: bool,
    pub message_type: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: Timestamp,
    pub sender_full_name: String,
    pub sender_email: String,
}

/// A message with its sender's display info.
#[derive(Debug, Clone, Serialize)]
pub struct MessageWithSender {
    #[serde(flatten)]
    pub message: Message,
    pub sender: Participant,
}

impl From<MessageSenderRow> for MessageWithSender {
    fn from(row: MessageSenderRow) -> Self {
        MessageWithSender {
            sender: Participant {
                id: row.sender_id,
                full_name: row.sender_full_name,
                email: row.sender_email,
            },
            message: Message {
                id: row.id,
                conversation_id: row.conversation_id,
                sender_id: row.sender_id,
                content: row.content,
                is_read: row.is_read,
                message_type: row.message_type,
                file_url: row.file_url,
                file_name: row.file_name,
                file_size: row.file_size,
                created_at: row.created_at,
            },
        }
    }
}
