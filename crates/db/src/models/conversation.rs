//! Conversation entity model and enriched list/detail views.

use serde::Serialize;
use sqlx::FromRow;

use sejour_core::types::{Day, DbId, Timestamp};

use crate::models::message::MessageWithSender;
use crate::models::user::Participant;

/// A conversation row from the `conversations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub booking_id: DbId,
    pub client_id: DbId,
    pub owner_id: DbId,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Flat join row: conversation + both participants + booking/property
/// context, fetched in one query and enriched into
/// [`ConversationWithDetails`] by the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationDetailRow {
    pub id: DbId,
    pub booking_id: DbId,
    pub client_id: DbId,
    pub owner_id: DbId,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub client_full_name: String,
    pub client_email: String,
    pub owner_full_name: String,
    pub owner_email: String,
    pub property_title: Option<String>,
    pub booking_start_date: Option<Day>,
}

/// A conversation enriched with participants, booking context, a fresh
/// unread count, and the most recent message.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationWithDetails {
    pub id: DbId,
    pub booking_id: DbId,
    pub client_id: DbId,
    pub owner_id: DbId,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub client: Participant,
    pub owner: Participant,
    pub property_title: Option<String>,
    pub booking_start_date: Option<Day>,
    pub unread_count: i64,
    pub last_message: Option<MessageWithSender>,
}

impl ConversationDetailRow {
    /// Attach the per-requester fields computed separately.
    pub fn into_details(
        self,
        unread_count: i64,
        last_message: Option<MessageWithSender>,
    ) -> ConversationWithDetails {
        ConversationWithDetails {
            id: self.id,
            booking_id: self.booking_id,
            client_id: self.client_id,
            owner_id: self.owner_id,
            last_message_at: self.last_message_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            client: Participant {
                id: self.client_id,
                full_name: self.client_full_name,
                email: self.client_email,
            },
            owner: Participant {
                id: self.owner_id,
                full_name: self.owner_full_name,
                email: self.owner_email,
            },
            property_title: self.property_title,
            booking_start_date: self.booking_start_date,
            unread_count,
            last_message,
        }
    }

    /// Whether `user_id` is one of the two participants.
    pub fn is_participant(&self, user_id: DbId) -> bool {
        self.client_id == user_id || self.owner_id == user_id
    }
}
