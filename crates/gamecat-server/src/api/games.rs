use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use gamecat_core::{AppId, AppListEntry, CatalogEntry, GameFilter, PriceRange, RankEntry};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Deserialize)]
pub(super) struct RankingQuery {
    pub num_games: usize,
}

/// Search parameters; list-valued criteria are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    pub appid: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub tags: Option<String>,
    pub features: Option<String>,
    pub edition_min: Option<Decimal>,
    pub edition_max: Option<Decimal>,
}

impl SearchQuery {
    fn into_filter(self) -> Result<GameFilter, &'static str> {
        let appid = match self.appid {
            Some(raw) => Some(AppId::new(raw).ok_or("appid must be positive")?),
            None => None,
        };
        if self
            .edition_min
            .into_iter()
            .chain(self.edition_max)
            .any(|bound| bound.is_sign_negative())
        {
            return Err("edition price bounds must not be negative");
        }
        let price = (self.edition_min.is_some() || self.edition_max.is_some()).then_some(
            PriceRange {
                min: self.edition_min,
                max: self.edition_max,
            },
        );

        Ok(GameFilter {
            appid,
            title: non_blank(self.title),
            description: non_blank(self.description),
            release_date: self.release_date,
            developers: split_list(self.developers.as_deref()),
            publishers: split_list(self.publishers.as_deref()),
            tags: split_list(self.tags.as_deref()),
            features: split_list(self.features.as_deref()),
            price,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

fn ok<T: serde::Serialize>(req_id: RequestId, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_games(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> ApiResult<Vec<CatalogEntry>> {
    let games = state
        .pipeline
        .list_games()
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    ok(req_id, games)
}

pub(super) async fn add_game(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(appid): Path<u32>,
) -> Result<(StatusCode, Json<ApiResponse<CatalogEntry>>), ApiError> {
    let appid = AppId::new(appid)
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "appid must be positive"))?;

    let entry = state
        .pipeline
        .add_game(appid)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: entry,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn search_games(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<CatalogEntry>> {
    let filter = query
        .into_filter()
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let games = state
        .pipeline
        .search(&filter)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    ok(req_id, games)
}

pub(super) async fn top_games(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Vec<RankEntry>> {
    let ranking = state
        .pipeline
        .get_ranking(query.num_games)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    ok(req_id, ranking)
}

pub(super) async fn top_games_metadata(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Vec<CatalogEntry>> {
    let entries = state
        .pipeline
        .get_ranking_with_metadata(query.num_games)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    ok(req_id, entries)
}

pub(super) async fn applist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> ApiResult<Vec<AppListEntry>> {
    let apps = state
        .pipeline
        .mirror_applist()
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    ok(req_id, apps)
}
