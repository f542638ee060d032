//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sejour_core::types::{DbId, Timestamp};

/// A user row from the `users` table. Never serialized to clients directly;
/// use [`PublicUser`] instead so the password hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub id_document_urls: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
}

/// DTO for profile updates. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_verified: Option<bool>,
}

/// Client-facing user representation, without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Minimal participant info embedded in conversations and messages.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
}
