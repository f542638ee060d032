//! Blocked-date rows for the availability ledger.

use sqlx::FromRow;

use sejour_core::types::{Day, DbId, Timestamp};

/// A row from `property_blocked_dates`.
#[derive(Debug, Clone, FromRow)]
pub struct BlockedDate {
    pub id: DbId,
    pub property_id: DbId,
    pub blocked_date: Day,
    pub created_at: Timestamp,
}
