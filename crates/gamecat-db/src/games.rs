//! Database operations for the `games` catalog table.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use gamecat_core::{AppId, CatalogEntry, DeveloperRoles, GameFilter};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

const GAME_COLUMNS: &str = "appid, title, description, release_date, developers, tags, \
                            editions, features, created_at";

/// A row from the `games` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    pub appid: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub developers: Json<DeveloperRoles>,
    pub tags: Vec<String>,
    /// Prices are stored as decimal strings to keep two-place precision.
    pub editions: Json<BTreeMap<String, Decimal>>,
    /// `NULL` when the source page had no features section.
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GameRow> for CatalogEntry {
    type Error = DbError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let appid = AppId::try_from(row.appid).map_err(|e| DbError::InvalidRow(e.to_string()))?;
        Ok(CatalogEntry {
            appid,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            developers: row.developers.0,
            tags: row.tags,
            editions: row.editions.0,
            features: row.features,
        })
    }
}

fn rows_to_entries(rows: Vec<GameRow>) -> Result<Vec<CatalogEntry>, DbError> {
    rows.into_iter().map(CatalogEntry::try_from).collect()
}

/// Fetches one catalog entry by `appid`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_game(pool: &PgPool, appid: AppId) -> Result<Option<CatalogEntry>, DbError> {
    let row = sqlx::query_as::<_, GameRow>(&format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE appid = $1"
    ))
    .bind(i64::from(appid))
    .fetch_optional(pool)
    .await?;

    row.map(CatalogEntry::try_from).transpose()
}

/// Returns every stored entry ordered by `appid`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_games(pool: &PgPool) -> Result<Vec<CatalogEntry>, DbError> {
    let rows = sqlx::query_as::<_, GameRow>(&format!(
        "SELECT {GAME_COLUMNS} FROM games ORDER BY appid"
    ))
    .fetch_all(pool)
    .await?;

    rows_to_entries(rows)
}

/// Inserts a new catalog entry.
///
/// The primary key on `appid` is the duplicate guard; there is no
/// read-before-write, so two concurrent inserts cannot both succeed.
///
/// # Errors
///
/// Returns [`DbError::Duplicate`] if the `appid` already exists, or
/// [`DbError::Sqlx`] for any other failure.
pub async fn insert_game(pool: &PgPool, entry: &CatalogEntry) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO games \
             (appid, title, description, release_date, developers, tags, editions, features) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(i64::from(entry.appid))
    .bind(&entry.title)
    .bind(&entry.description)
    .bind(entry.release_date)
    .bind(Json(&entry.developers))
    .bind(&entry.tags)
    .bind(Json(&entry.editions))
    .bind(&entry.features)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Duplicate {
            appid: entry.appid,
        },
        other => DbError::Sqlx(other),
    })?;

    Ok(())
}

/// Deletes one entry. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_game(pool: &PgPool, appid: AppId) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM games WHERE appid = $1")
        .bind(i64::from(appid))
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Searches the catalog with OR-combined criteria and an AND-ed price range.
///
/// Mirrors [`GameFilter::matches`]: text criteria are case-insensitive, list
/// criteria match when any value overlaps, and the price range is satisfied
/// by any single edition.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_games(pool: &PgPool, filter: &GameFilter) -> Result<Vec<CatalogEntry>, DbError> {
    let lower = |values: &[String]| -> Vec<String> {
        values.iter().map(|v| v.to_lowercase()).collect()
    };
    let price = filter.price.unwrap_or_default();

    let rows = sqlx::query_as::<_, GameRow>(&format!(
        "SELECT {GAME_COLUMNS} FROM games g \
         WHERE ( \
               NOT $11::BOOLEAN \
            OR ($1::BIGINT IS NOT NULL AND g.appid = $1) \
            OR ($2::TEXT IS NOT NULL AND g.title ILIKE $2) \
            OR ($3::TEXT IS NOT NULL AND g.description ILIKE $3) \
            OR ($4::DATE IS NOT NULL AND g.release_date = $4) \
            OR LOWER(g.developers ->> 'developer') = ANY($5::TEXT[]) \
            OR LOWER(g.developers ->> 'publisher') = ANY($6::TEXT[]) \
            OR EXISTS (SELECT 1 FROM unnest(g.tags) AS t(tag) WHERE LOWER(t.tag) = ANY($7::TEXT[])) \
            OR EXISTS (SELECT 1 FROM unnest(g.features) AS f(feature) WHERE LOWER(f.feature) = ANY($8::TEXT[])) \
         ) \
         AND ( \
               NOT $12::BOOLEAN \
            OR EXISTS ( \
                 SELECT 1 FROM jsonb_each_text(g.editions) AS e(name, price) \
                 WHERE ($9::NUMERIC IS NULL OR e.price::NUMERIC >= $9) \
                   AND ($10::NUMERIC IS NULL OR e.price::NUMERIC <= $10) \
               ) \
         ) \
         ORDER BY g.appid"
    ))
    .bind(filter.appid.map(i64::from))
    .bind(filter.title.as_deref().map(like_pattern))
    .bind(filter.description.as_deref().map(like_pattern))
    .bind(filter.release_date)
    .bind(lower(&filter.developers))
    .bind(lower(&filter.publishers))
    .bind(lower(&filter.tags))
    .bind(lower(&filter.features))
    .bind(price.min)
    .bind(price.max)
    .bind(filter.has_criteria())
    .bind(filter.price.is_some())
    .fetch_all(pool)
    .await?;

    rows_to_entries(rows)
}

/// Wraps user input in `%…%` for `ILIKE`, escaping LIKE metacharacters so
/// they match literally.
fn like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
