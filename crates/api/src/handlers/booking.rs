//! Handlers for the `/bookings` resource.
//!
//! Booking creation validates dates and availability in the handler; the
//! exclusion constraint on `bookings` backstops the overlap check when two
//! requests race. Every transition fires a detached system-message task.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use sejour_core::booking::{
    nights_between, total_price, validate_booking_dates, BookingStatus,
};
use sejour_core::error::CoreError;
use sejour_core::roles::{ROLE_ADMIN, ROLE_CLIENT, ROLE_OWNER};
use sejour_core::types::{Day, DbId};
use sejour_db::models::booking::{Booking, BookingWithProperty, CreateBooking};
use sejour_db::repositories::{BlockedDateRepo, BookingRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireClient, RequireOwner};
use crate::notify;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: DbId,
    pub start_date: Day,
    /// Exclusive checkout date.
    pub end_date: Day,
    pub guests: i32,
    pub message: Option<String>,
}

/// Request body for `PUT /bookings/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/bookings
///
/// Clients see their bookings, owners the bookings on their properties,
/// admins everything. Each row embeds a compact property summary.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<BookingWithProperty>>>> {
    let rows = match user.role.as_str() {
        ROLE_CLIENT => BookingRepo::list_for_client(&state.pool, user.user_id).await?,
        ROLE_OWNER => BookingRepo::list_for_owner(&state.pool, user.user_id).await?,
        _ => BookingRepo::list_all(&state.pool).await?,
    };
    Ok(Json(ApiResponse::new(rows)))
}

/// GET /api/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<BookingWithProperty>>> {
    let row = BookingRepo::find_with_property(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id,
        }))?;

    ensure_booking_access(&state, &row.booking, &user).await?;
    Ok(Json(ApiResponse::new(row)))
}

/// POST /api/bookings
///
/// Client-only. Validates the stay, checks availability against blocked
/// dates and active bookings, prices the stay, and inserts as `pending`.
pub async fn create(
    State(state): State<AppState>,
    RequireClient(user): RequireClient,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    if input.guests < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "Le nombre de voyageurs doit être au moins 1".into(),
        )));
    }

    let today = chrono::Utc::now().date_naive();
    validate_booking_dates(input.start_date, input.end_date, today)?;

    let property = PropertyRepo::find_by_id(&state.pool, input.property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id: input.property_id,
        }))?;

    let blocked =
        BlockedDateRepo::has_any_in_range(&state.pool, property.id, input.start_date, input.end_date)
            .await?;
    let taken = BookingRepo::has_overlapping_active(
        &state.pool,
        property.id,
        input.start_date,
        input.end_date,
    )
    .await?;
    if blocked || taken {
        return Err(AppError::Core(CoreError::BusinessRule(
            "Ces dates ne sont plus disponibles pour cette propriété".into(),
        )));
    }

    let nights = nights_between(input.start_date, input.end_date);
    let booking = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            property_id: property.id,
            client_id: user.user_id,
            start_date: input.start_date,
            end_date: input.end_date,
            nights,
            guests: input.guests,
            message: input.message,
            total_price: total_price(nights, property.price_per_night),
        },
    )
    .await?;

    notify::booking_status_changed(&state, booking.clone(), BookingStatus::Pending);

    Ok((StatusCode::CREATED, Json(ApiResponse::new(booking))))
}

/// PUT /api/bookings/{id}/status
///
/// Owner decision on a pending booking: `accepted` or `declined` only.
pub async fn update_status(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let target = BookingStatus::parse(&input.status)?;
    if target != BookingStatus::Accepted && target != BookingStatus::Declined {
        return Err(AppError::Core(CoreError::Validation(
            "Le statut doit être 'accepted' ou 'declined'".into(),
        )));
    }

    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id,
        }))?;

    if user.role != ROLE_ADMIN {
        let property = PropertyRepo::find_by_id(&state.pool, booking.property_id).await?;
        let owns = property.is_some_and(|p| p.owner_id == user.user_id);
        if !owns {
            return Err(AppError::Core(CoreError::Forbidden(
                "Vous ne pouvez gérer que les réservations de vos propriétés".into(),
            )));
        }
    }

    let current = BookingStatus::parse(&booking.status)?;
    if !current.can_transition_to(target) || current != BookingStatus::Pending {
        return Err(AppError::Core(CoreError::BusinessRule(format!(
            "Transition impossible de '{}' vers '{}'",
            current.as_str(),
            target.as_str()
        ))));
    }

    let updated = BookingRepo::update_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id,
        }))?;

    notify::booking_status_changed(&state, updated.clone(), target);

    Ok(Json(ApiResponse::new(updated)))
}

/// PUT /api/bookings/{id}/cancel
///
/// Clients may cancel their own pending bookings; owners any non-terminal
/// booking on their property; admins any non-terminal booking.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id,
        }))?;

    let current = BookingStatus::parse(&booking.status)?;
    if !current.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::Core(CoreError::BusinessRule(format!(
            "Une réservation '{}' ne peut plus être annulée",
            current.as_str()
        ))));
    }

    match user.role.as_str() {
        ROLE_CLIENT => {
            if booking.client_id != user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Vous ne pouvez annuler que vos propres réservations".into(),
                )));
            }
            if current != BookingStatus::Pending {
                return Err(AppError::Core(CoreError::BusinessRule(
                    "Seule une réservation en attente peut être annulée par le client".into(),
                )));
            }
        }
        ROLE_OWNER => {
            let property = PropertyRepo::find_by_id(&state.pool, booking.property_id).await?;
            let owns = property.is_some_and(|p| p.owner_id == user.user_id);
            if !owns {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Vous ne pouvez annuler que les réservations de vos propriétés".into(),
                )));
            }
        }
        // Admin: unrestricted within the state machine.
        _ => {}
    }

    let updated = BookingRepo::update_status(&state.pool, id, BookingStatus::Cancelled.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "booking",
            id,
        }))?;

    notify::booking_status_changed(&state, updated.clone(), BookingStatus::Cancelled);

    Ok(Json(ApiResponse::new(updated)))
}

async fn ensure_booking_access(
    state: &AppState,
    booking: &Booking,
    user: &AuthUser,
) -> AppResult<()> {
    match user.role.as_str() {
        ROLE_CLIENT => {
            if booking.client_id != user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Accès refusé à cette réservation".into(),
                )));
            }
        }
        ROLE_OWNER => {
            let property = PropertyRepo::find_by_id(&state.pool, booking.property_id).await?;
            if !property.is_some_and(|p| p.owner_id == user.user_id) {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Accès refusé à cette réservation".into(),
                )));
            }
        }
        _ => {}
    }
    Ok(())
}
