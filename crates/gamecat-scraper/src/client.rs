//! HTTP client for storefront item pages and the public app list.

use std::time::Duration;

use gamecat_core::{AppConfig, AppId, AppListEntry};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::AppListResponse;

/// Age-gate bypass plus an English storefront, so dates and price labels
/// render in the format the extractor expects.
const STOREFRONT_COOKIES: &str =
    "birthtime=0; mature_content=1; wants_mature_content=1; Steam_Language=english";
const STOREFRONT_LANGUAGE: &str = "en-US,en;q=0.9";

/// A fetched page: where the request ended up after redirects, and its body.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub final_url: Url,
    pub body: String,
}

/// Client for the storefront's item pages.
///
/// Every request carries the configured timeout and is attempted once.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Creates a client for the storefront rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(STOREFRONT_COOKIES));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(STOREFRONT_LANGUAGE));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from the storefront settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.storefront_base_url,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Canonical item URL, e.g. `https://store.steampowered.com/app/620`.
    #[must_use]
    pub fn app_url(&self, appid: AppId) -> String {
        format!("{}/app/{appid}", self.base_url)
    }

    /// Global top-sellers chart, which is only populated after JavaScript runs.
    #[must_use]
    pub fn chart_url(&self) -> String {
        format!("{}/charts/topselling/global", self.base_url)
    }

    /// GETs `url`, following redirects, and returns the final URL and body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on connection failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx final response.
    pub async fn fetch_document(&self, url: &str) -> Result<FetchedDocument, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok(FetchedDocument { final_url, body })
    }

    /// Returns `true` if the item page for `appid` exists.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; they never count as "invalid".
    pub async fn validate_app(&self, appid: AppId) -> Result<bool, ScraperError> {
        let document = self.fetch_document(&self.app_url(appid)).await?;
        Ok(resolves_to_app(&document.final_url, appid))
    }

    /// Validates `appid` and returns its page from the same request.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotResolved`] when the storefront redirected away
    ///   from the item page.
    /// - Any error from [`StorefrontClient::fetch_document`].
    pub async fn resolve_app(&self, appid: AppId) -> Result<FetchedDocument, ScraperError> {
        let url = self.app_url(appid);
        let document = self.fetch_document(&url).await?;
        if !resolves_to_app(&document.final_url, appid) {
            tracing::debug!(
                appid = %appid,
                final_url = %document.final_url,
                "storefront redirected away from item page"
            );
            return Err(ScraperError::NotResolved { appid });
        }
        Ok(document)
    }

    /// Downloads the storefront's public app list.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] on
    ///   request failure.
    /// - [`ScraperError::Deserialize`] if the body is not the expected
    ///   `{"applist": {"apps": [...]}}` shape.
    pub async fn fetch_applist(&self, url: &str) -> Result<Vec<AppListEntry>, ScraperError> {
        let document = self.fetch_document(url).await?;
        let parsed: AppListResponse =
            serde_json::from_str(&document.body).map_err(|source| ScraperError::Deserialize {
                context: url.to_string(),
                source,
            })?;
        Ok(parsed.applist.apps)
    }
}

/// `true` when `url`'s path still contains the `app/<appid>` segment pair.
///
/// A redirect to the storefront home or a search page drops that pair.
#[must_use]
pub fn resolves_to_app(url: &Url, appid: AppId) -> bool {
    let wanted = appid.to_string();
    url.path_segments().is_some_and(|segments| {
        let segments: Vec<&str> = segments.collect();
        segments
            .windows(2)
            .any(|pair| pair[0] == "app" && pair[1] == wanted)
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
