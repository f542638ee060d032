//! Handlers for the `/properties/{id}/blocked-dates` resource.
//!
//! Owners block out dates their property cannot be booked. Input dates are
//! strings; anything not strictly `YYYY-MM-DD` is silently dropped, matching
//! the calendar widget contract on the frontend.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use sejour_core::availability::filter_valid_dates;
use sejour_core::error::CoreError;
use sejour_core::roles::ROLE_ADMIN;
use sejour_core::types::{Day, DbId};
use sejour_db::repositories::{BlockedDateRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOwner;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for blocked-date add/remove.
#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    pub dates: Vec<String>,
}

/// GET /api/properties/{id}/blocked-dates
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(property_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<Day>>>> {
    ensure_property_exists(&state, property_id).await?;
    let dates = BlockedDateRepo::list_dates(&state.pool, property_id).await?;
    Ok(Json(ApiResponse::new(dates)))
}

/// POST /api/properties/{id}/blocked-dates
///
/// Adds the valid dates from the request (duplicates ignored) and returns
/// the full ledger. A request where every date is malformed is a 400.
pub async fn add(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    Path(property_id): Path<DbId>,
    Json(input): Json<DatesRequest>,
) -> AppResult<Json<ApiResponse<Vec<Day>>>> {
    ensure_ownership(&state, property_id, &user).await?;

    let valid = filter_valid_dates(&input.dates);
    if valid.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Aucune date valide fournie".into(),
        )));
    }

    BlockedDateRepo::add_many(&state.pool, property_id, &valid).await?;
    let dates = BlockedDateRepo::list_dates(&state.pool, property_id).await?;
    Ok(Json(ApiResponse::with_message(dates, "Dates bloquées")))
}

/// DELETE /api/properties/{id}/blocked-dates
///
/// Removes the valid dates from the ledger. An all-malformed request is a
/// no-op, not an error.
pub async fn remove(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    Path(property_id): Path<DbId>,
    Json(input): Json<DatesRequest>,
) -> AppResult<Json<ApiResponse<Vec<Day>>>> {
    ensure_ownership(&state, property_id, &user).await?;

    let valid = filter_valid_dates(&input.dates);
    if !valid.is_empty() {
        BlockedDateRepo::remove_many(&state.pool, property_id, &valid).await?;
    }

    let dates = BlockedDateRepo::list_dates(&state.pool, property_id).await?;
    Ok(Json(ApiResponse::with_message(dates, "Dates débloquées")))
}

async fn ensure_property_exists(state: &AppState, property_id: DbId) -> AppResult<()> {
    if PropertyRepo::find_by_id(&state.pool, property_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "property",
            id: property_id,
        }));
    }
    Ok(())
}

async fn ensure_ownership(
    state: &AppState,
    property_id: DbId,
    user: &AuthUser,
) -> AppResult<()> {
    let property = PropertyRepo::find_by_id(&state.pool, property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id: property_id,
        }))?;

    if user.role != ROLE_ADMIN && property.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Vous ne pouvez gérer que les disponibilités de vos propriétés".into(),
        )));
    }
    Ok(())
}
