//! Shared response envelope types.
//!
//! Every success response is `{ "success": true, "data": ... }`, optionally
//! carrying a human-readable `message` and a `pagination` block. Errors use
//! the mirrored `{ "success": false, "error": { ... } }` shape produced by
//! [`crate::error::AppError`].

use serde::Serialize;

use sejour_core::pagination::PaginationMeta;

/// Standard `{ "success": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Plain success envelope around a payload.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
        }
    }

    /// Success envelope with an accompanying message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            pagination: None,
        }
    }

    /// Success envelope carrying pagination metadata.
    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: Some(pagination),
        }
    }
}
