//! Handlers for the `/auth` resource (register, login, me, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use sejour_core::error::CoreError;
use sejour_core::roles::{ROLE_CLIENT, ROLE_OWNER};
use sejour_db::models::user::{CreateUser, PublicUser};
use sejour_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Le nom complet est requis"))]
    pub full_name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    /// `client` (default) or `owner`. Admin accounts are provisioned
    /// out-of-band.
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: PublicUser,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account and return the sanitized user plus a signed token.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = match input.role.as_deref() {
        None => ROLE_CLIENT,
        Some(r) if r == ROLE_CLIENT || r == ROLE_OWNER => r,
        Some(other) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Rôle invalide: {other}"
            ))))
        }
    };

    // Early duplicate check for a friendly error; the unique constraint on
    // users.email backstops the race and maps to the same 400.
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "Un compte existe déjà avec cette adresse email".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            password_hash,
            role: role.to_string(),
        },
    )
    .await?;

    let token = generate_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthData {
                user: user.into(),
                token,
            },
            "Compte créé avec succès",
        )),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. An unknown email is a 404 so the
/// frontend can route to sign-up; a wrong password is a plain 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMsg(
                "Aucun compte associé à cette adresse email".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Email ou mot de passe incorrect".into(),
        )));
    }

    let token = generate_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(ApiResponse::new(AuthData {
        user: user.into(),
        token,
    })))
}

/// GET /api/auth/me
///
/// Current user, re-read from the database so role/profile changes since
/// token issue are visible.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    Ok(Json(ApiResponse::new(row.into())))
}

/// POST /api/auth/logout
///
/// Stateless acknowledgement. Tokens carry their own expiry and there is no
/// revocation list; the client simply discards the token.
pub async fn logout(_user: AuthUser) -> Json<ApiResponse<()>> {
    Json(ApiResponse::with_message((), "Déconnexion réussie"))
}
