//! Local mirror of the storefront's public app list.

use gamecat_core::AppListEntry;
use sqlx::PgPool;

use crate::DbError;

/// Replaces the mirror with `apps` in one transaction.
///
/// The list runs to six figures, so rows go in as two parallel arrays
/// through `UNNEST` rather than one statement per row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete or insert fails.
pub async fn replace_applist(pool: &PgPool, apps: &[AppListEntry]) -> Result<usize, DbError> {
    let appids: Vec<i64> = apps.iter().map(|a| i64::from(a.appid)).collect();
    let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM applist").execute(&mut *tx).await?;

    let inserted = sqlx::query(
        "INSERT INTO applist (appid, name) \
         SELECT * FROM UNNEST($1::BIGINT[], $2::TEXT[])",
    )
    .bind(appids)
    .bind(names)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    Ok(usize::try_from(inserted).unwrap_or(usize::MAX))
}

/// Number of rows currently mirrored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_applist(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applist")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
