//! Handlers for the `/conversations` and `/messages` resources.
//!
//! One conversation per booking. Listing is the expensive read (participants,
//! property context, unread count, last message per row) and goes through the
//! two-minute per-user cache; unread counts inside a conversation are always
//! read fresh.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use sejour_cache::{keys, CONVERSATIONS_TTL_SECS};
use sejour_core::chat::{validate_message_content, MessageType};
use sejour_core::error::CoreError;
use sejour_core::pagination::{clamp_page, PaginationMeta};
use sejour_core::roles::ROLE_ADMIN;
use sejour_core::types::DbId;
use sejour_db::models::conversation::{Conversation, ConversationWithDetails};
use sejour_db::models::message::{CreateMessage, Message, MessageWithSender};
use sejour_db::repositories::{
    BookingRepo, ConversationRepo, MessageRepo, PropertyRepo,
};
use sejour_storage::image as img;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Maximum size of a chat attachment, in bytes (20 MB).
pub const MAX_FILE_BYTES: usize = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query for `GET /conversations`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /conversations`.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub booking_id: DbId,
}

/// Query for `GET /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Request body for `POST /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/conversations
///
/// The requester's conversations (all of them for admins), enriched with
/// participants, property context, unread count, and last message. Cached
/// per user for two minutes.
pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Value>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let key = keys::conversations(&user.user_id.to_string(), limit, offset);
    if let Some(cached) = state.cache.get_json::<Value>(&key).await {
        return Ok(Json(cached));
    }

    let rows =
        ConversationRepo::list_for_user(&state.pool, user.user_id, &user.role, limit, offset)
            .await?;

    let mut enriched: Vec<ConversationWithDetails> = Vec::with_capacity(rows.len());
    for row in rows {
        let unread = MessageRepo::unread_count(&state.pool, row.id, user.user_id)
            .await
            .unwrap_or(0);
        let last = MessageRepo::last_message(&state.pool, row.id).await?;
        enriched.push(row.into_details(unread, last));
    }

    let value = serde_json::to_value(ApiResponse::new(enriched))
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
    state
        .cache
        .set_json(&key, &value, CONVERSATIONS_TTL_SECS)
        .await;

    Ok(Json(value))
}

/// POST /api/conversations
///
/// Create (or return) the conversation for a booking. Participants are
/// derived from the booking, never from the request.
pub async fn create_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateConversationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Conversation>>)> {
    let booking = BookingRepo::find_by_id(&state.pool, input.booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id: input.booking_id,
        }))?;

    let property = PropertyRepo::find_by_id(&state.pool, booking.property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id: booking.property_id,
        }))?;

    let is_participant = user.user_id == booking.client_id || user.user_id == property.owner_id;
    if user.role != ROLE_ADMIN && !is_participant {
        return Err(AppError::Core(CoreError::Forbidden(
            "Accès refusé à cette réservation".into(),
        )));
    }

    if let Some(existing) = ConversationRepo::find_by_booking(&state.pool, booking.id).await? {
        return Ok((StatusCode::OK, Json(ApiResponse::new(existing))));
    }

    let conversation = match ConversationRepo::create(
        &state.pool,
        booking.id,
        booking.client_id,
        property.owner_id,
    )
    .await
    {
        Ok(c) => c,
        // Lost the unique race: someone created it between our read and
        // insert. The existing row is the answer.
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("uq_conversations_booking") =>
        {
            ConversationRepo::find_by_booking(&state.pool, booking.id)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("Conversation vanished after unique race".into())
                })?
        }
        Err(e) => return Err(e.into()),
    };

    state
        .cache
        .invalidate_conversations(&conversation.client_id.to_string())
        .await;
    state
        .cache
        .invalidate_conversations(&conversation.owner_id.to_string())
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(conversation))))
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ConversationWithDetails>>> {
    let row = ConversationRepo::detail_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "conversation",
            id,
        }))?;

    if user.role != ROLE_ADMIN && !row.is_participant(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Accès refusé à cette conversation".into(),
        )));
    }

    let unread = MessageRepo::unread_count(&state.pool, id, user.user_id)
        .await
        .unwrap_or(0);
    let last = MessageRepo::last_message(&state.pool, id).await?;

    Ok(Json(ApiResponse::new(row.into_details(unread, last))))
}

/// GET /api/conversations/{id}/messages
///
/// Pages are fetched newest-first for efficiency, then reversed so the
/// payload reads chronologically.
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<MessagesQuery>,
) -> AppResult<Json<ApiResponse<Vec<MessageWithSender>>>> {
    ensure_participant(&state, id, &user).await?;

    let (page, limit, offset) = clamp_page(query.page, query.limit);
    let mut messages = MessageRepo::list_page(&state.pool, id, limit, offset).await?;
    messages.reverse();
    let total = MessageRepo::count(&state.pool, id).await?;

    Ok(Json(ApiResponse::paginated(
        messages,
        PaginationMeta::new(page, limit, total),
    )))
}

/// POST /api/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let conversation = ensure_participant(&state, id, &user).await?;

    let content = validate_message_content(&input.content)?;

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            conversation_id: id,
            sender_id: user.user_id,
            content,
            message_type: MessageType::User.as_str().to_string(),
            file_url: input.file_url,
            file_name: input.file_name,
            file_size: input.file_size,
        },
    )
    .await?;

    invalidate_both(&state, conversation.0, conversation.1).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(message))))
}

/// PUT /api/messages/{id}/read
///
/// Marking your own message read is a no-op, not an error.
pub async fn mark_message_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let message = MessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "message",
            id,
        }))?;

    let conversation =
        ensure_participant(&state, message.conversation_id, &user).await?;

    if message.sender_id == user.user_id {
        return Ok(Json(ApiResponse::new(message)));
    }

    MessageRepo::mark_read(&state.pool, id).await?;
    let updated = MessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "message",
            id,
        }))?;

    invalidate_both(&state, conversation.0, conversation.1).await;

    Ok(Json(ApiResponse::new(updated)))
}

/// GET /api/conversations/{id}/unread-count
///
/// Always computed fresh; a failure degrades to zero rather than erroring,
/// since this feeds a badge, not a decision.
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<i64>>> {
    ensure_participant(&state, id, &user).await?;

    let count = MessageRepo::unread_count(&state.pool, id, user.user_id)
        .await
        .unwrap_or(0);
    Ok(Json(ApiResponse::new(count)))
}

/// POST /api/conversations/{id}/upload-file
///
/// Stores the raw attachment under the conversation's namespace and posts a
/// message carrying the file metadata.
pub async fn upload_file(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let conversation = ensure_participant(&state, id, &user).await?;

    let store = state.store.clone().ok_or_else(|| {
        AppError::InternalError("Object storage is not configured".to_string())
    })?;

    let mut uploaded: Option<(String, String, i64)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("fichier").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.len() > MAX_FILE_BYTES {
            return Err(AppError::Core(CoreError::Validation(
                "Le fichier ne peut pas dépasser 20 Mo".into(),
            )));
        }

        let stamp = chrono::Utc::now().timestamp_millis();
        let key = img::message_file_key(&id.to_string(), stamp, &file_name);
        let url = store.upload(&key, data.to_vec(), &content_type).await?;
        uploaded = Some((url, file_name, data.len() as i64));
        break;
    }

    let (file_url, file_name, file_size) = uploaded.ok_or_else(|| {
        AppError::BadRequest("Aucun fichier reçu dans la requête multipart".to_string())
    })?;

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            conversation_id: id,
            sender_id: user.user_id,
            content: file_name.clone(),
            message_type: MessageType::User.as_str().to_string(),
            file_url: Some(file_url),
            file_name: Some(file_name),
            file_size: Some(file_size),
        },
    )
    .await?;

    invalidate_both(&state, conversation.0, conversation.1).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(message))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify the requester may act inside the conversation. Returns the
/// participant pair for cache invalidation.
async fn ensure_participant(
    state: &AppState,
    conversation_id: DbId,
    user: &AuthUser,
) -> AppResult<(DbId, DbId)> {
    let conversation = ConversationRepo::detail_by_id(&state.pool, conversation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "conversation",
            id: conversation_id,
        }))?;

    if user.role != ROLE_ADMIN && !conversation.is_participant(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Accès refusé à cette conversation".into(),
        )));
    }
    Ok((conversation.client_id, conversation.owner_id))
}

async fn invalidate_both(state: &AppState, client_id: DbId, owner_id: DbId) {
    state
        .cache
        .invalidate_conversations(&client_id.to_string())
        .await;
    state
        .cache
        .invalidate_conversations(&owner_id.to_string())
        .await;
}
