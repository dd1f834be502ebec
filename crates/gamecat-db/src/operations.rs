//! Last-update timestamps keyed by operation name.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Records `at` as the last time `operation` completed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_operation_time(
    pool: &PgPool,
    operation: &str,
    at: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO operation_timestamps (operation, last_update) VALUES ($1, $2) \
         ON CONFLICT (operation) DO UPDATE SET last_update = EXCLUDED.last_update",
    )
    .bind(operation)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the last recorded time for `operation`, or `None` if it never ran.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_operation_time(
    pool: &PgPool,
    operation: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
    let at = sqlx::query_scalar::<_, DateTime<Utc>>(
        "SELECT last_update FROM operation_timestamps WHERE operation = $1",
    )
    .bind(operation)
    .fetch_optional(pool)
    .await?;

    Ok(at)
}
