//! Repository for the `bookings` table.

use sqlx::PgPool;

use sejour_core::types::{Day, DbId};

use crate::models::booking::{Booking, BookingPropertyRow, BookingWithProperty, CreateBooking};

/// Column list shared across plain booking queries.
const COLUMNS: &str = "id, property_id, client_id, start_date, end_date, nights, guests, \
     message, total_price, status, created_at, updated_at";

/// Join selecting a booking plus the compact property summary used by list
/// and detail views.
const JOINED_COLUMNS: &str = "b.id, b.property_id, b.client_id, b.start_date, b.end_date, b.nights, \
     b.guests, b.message, b.total_price, b.status, b.created_at, b.updated_at, \
     p.title AS property_title, p.city AS property_city, \
     p.image_urls AS property_image_urls";

/// Provides booking persistence and the overlap query backing availability.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking with status `pending`.
    ///
    /// The `ex_bookings_no_overlap` exclusion constraint rejects concurrent
    /// double-bookings; callers classify that violation as a domain error.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                (property_id, client_id, start_date, end_date, nights, guests, message, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.property_id)
            .bind(input.client_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.nights)
            .bind(input.guests)
            .bind(&input.message)
            .bind(input.total_price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A booking with its property summary attached.
    pub async fn find_with_property(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingWithProperty>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM bookings b
             JOIN properties p ON p.id = b.property_id
             WHERE b.id = $1"
        );
        let row = sqlx::query_as::<_, BookingPropertyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// All bookings made by a client, newest first.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<BookingWithProperty>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM bookings b
             JOIN properties p ON p.id = b.property_id
             WHERE b.client_id = $1
             ORDER BY b.created_at DESC"
        );
        let rows = sqlx::query_as::<_, BookingPropertyRow>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All bookings on properties owned by `owner_id`, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<BookingWithProperty>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM bookings b
             JOIN properties p ON p.id = b.property_id
             WHERE p.owner_id = $1
             ORDER BY b.created_at DESC"
        );
        let rows = sqlx::query_as::<_, BookingPropertyRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every booking on the platform, newest first. Admin views only.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<BookingWithProperty>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM bookings b
             JOIN properties p ON p.id = b.property_id
             ORDER BY b.created_at DESC"
        );
        let rows = sqlx::query_as::<_, BookingPropertyRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Active (pending/accepted) bookings for a property, used by calendar
    /// displays.
    pub async fn list_active_for_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE property_id = $1 AND status IN ('pending', 'accepted')
             ORDER BY start_date ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any active booking for the property touches `[start, end]`.
    ///
    /// Both endpoints count: a stay ending on June 5 still blocks one
    /// starting June 5, so there is no same-day changeover.
    pub async fn has_overlapping_active(
        pool: &PgPool,
        property_id: DbId,
        start: Day,
        end: Day,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM bookings
             WHERE property_id = $1
               AND status IN ('pending', 'accepted')
               AND start_date <= $3
               AND end_date >= $2
             LIMIT 1",
        )
        .bind(property_id)
        .bind(start)
        .bind(end)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }

    /// Set a booking's status, returning the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
