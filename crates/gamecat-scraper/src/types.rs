use gamecat_core::AppListEntry;
use serde::Deserialize;

/// Body of `ISteamApps/GetAppList/v2`.
#[derive(Debug, Deserialize)]
pub struct AppListResponse {
    pub applist: AppListBody,
}

#[derive(Debug, Deserialize)]
pub struct AppListBody {
    #[serde(default)]
    pub apps: Vec<AppListEntry>,
}
