//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sejour_core::error::CoreError;
use sejour_core::types::DbId;

use crate::auth::jwt::{validate_token, TokenError};
use crate::error::AppError;
use crate::state::AppState;

/// The identity carried by a valid `Authorization: Bearer <jwt>` header.
///
/// Any handler that takes an `AuthUser` parameter rejects unauthenticated
/// requests with 401 before the handler body runs. The fields come from the
/// token claims, so `email` and `role` reflect issue time, not the current
/// database row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Database id of the user (`claims.sub`).
    pub user_id: DbId,
    /// The user's email at token-issue time.
    pub email: String,
    /// The user's role name (`"client"`, `"owner"`, `"admin"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| match e {
            TokenError::Expired => unauthorized("Token expired"),
            TokenError::Invalid => unauthorized("Invalid token"),
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
