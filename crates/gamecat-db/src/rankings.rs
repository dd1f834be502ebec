//! Database operations for the `top_games` ranking table.

use gamecat_core::{AppId, RankEntry};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankRow {
    pub position: i32,
    pub appid: i64,
    pub title: String,
}

/// Replaces the whole ranking with `entries`; position 1 is the best seller.
///
/// Runs in one transaction so readers never observe a half-written chart.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the previous ranking is
/// kept in that case.
pub async fn replace_ranking(pool: &PgPool, entries: &[RankEntry]) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM top_games").execute(&mut *tx).await?;

    for (index, entry) in entries.iter().enumerate() {
        let position = i32::try_from(index + 1)
            .map_err(|_| DbError::InvalidRow(format!("ranking position {index} overflows")))?;
        sqlx::query("INSERT INTO top_games (position, appid, title) VALUES ($1, $2, $3)")
            .bind(position)
            .bind(i64::from(entry.appid))
            .bind(&entry.title)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Returns up to `limit` ranking entries ordered by position.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a stored `appid` is not positive.
pub async fn list_ranking(pool: &PgPool, limit: usize) -> Result<Vec<RankEntry>, DbError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = sqlx::query_as::<_, RankRow>(
        "SELECT position, appid, title FROM top_games ORDER BY position LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let appid =
                AppId::try_from(row.appid).map_err(|e| DbError::InvalidRow(e.to_string()))?;
            Ok(RankEntry {
                appid,
                title: row.title,
            })
        })
        .collect()
}
