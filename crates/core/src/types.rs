/// All database primary keys are PostgreSQL UUIDs (`gen_random_uuid()`).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (booking ranges, blocked dates) have day granularity.
pub type Day = chrono::NaiveDate;
