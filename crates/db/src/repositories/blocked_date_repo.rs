//! Repository for the `property_blocked_dates` table.
//!
//! Add/remove are idempotent set operations: adds ignore duplicates via
//! `ON CONFLICT DO NOTHING`, removes delete whatever is present.

use sqlx::PgPool;

use sejour_core::types::{Day, DbId};

/// Provides the availability ledger's blocked-date set operations.
pub struct BlockedDateRepo;

impl BlockedDateRepo {
    /// All blocked dates for a property, ascending.
    pub async fn list_dates(pool: &PgPool, property_id: DbId) -> Result<Vec<Day>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT blocked_date FROM property_blocked_dates
             WHERE property_id = $1
             ORDER BY blocked_date ASC",
        )
        .bind(property_id)
        .fetch_all(pool)
        .await
    }

    /// Upsert a batch of dates, ignoring ones already present.
    ///
    /// Returns the dates actually inserted by this call.
    pub async fn add_many(
        pool: &PgPool,
        property_id: DbId,
        dates: &[Day],
    ) -> Result<Vec<Day>, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO property_blocked_dates (property_id, blocked_date)
             SELECT $1, d FROM UNNEST($2::date[]) AS d
             ON CONFLICT (property_id, blocked_date) DO NOTHING
             RETURNING blocked_date",
        )
        .bind(property_id)
        .bind(dates)
        .fetch_all(pool)
        .await
    }

    /// Delete a batch of dates if present. Returns the number removed.
    pub async fn remove_many(
        pool: &PgPool,
        property_id: DbId,
        dates: &[Day],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM property_blocked_dates
             WHERE property_id = $1 AND blocked_date = ANY($2)",
        )
        .bind(property_id)
        .bind(dates)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Whether any blocked date falls inside `[start, end_exclusive)`.
    pub async fn has_any_in_range(
        pool: &PgPool,
        property_id: DbId,
        start: Day,
        end_exclusive: Day,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM property_blocked_dates
             WHERE property_id = $1 AND blocked_date >= $2 AND blocked_date < $3
             LIMIT 1",
        )
        .bind(property_id)
        .bind(start)
        .bind(end_exclusive)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }
}
