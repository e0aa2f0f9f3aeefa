//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Stored value no longer parses as its domain type
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// The partial unique index backing the one-active-booking rule
pub(crate) const ACTIVE_BOOKING_INDEX: &str = "service_bookings_active_uniq";

/// True when a statement lost to the active-booking unique index
///
/// Two concurrent conditional inserts can both pass the anti-join under
/// READ COMMITTED; the loser then trips the index and must be reported as
/// the duplicate it is, not as a storage failure.
pub(crate) fn is_active_booking_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation() && db.constraint() == Some(ACTIVE_BOOKING_INDEX))
}
