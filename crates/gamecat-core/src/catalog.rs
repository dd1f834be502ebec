//! Catalog domain types shared by the scraper, store, and HTTP layers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Storefront identifier (Steam `appid`). Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AppId(u32);

impl AppId {
    /// Returns `None` for `0`, which the storefront never assigns.
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for AppId {
    type Error = CoreError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| CoreError::InvalidAppId(raw.to_string()))
    }
}

impl TryFrom<i64> for AppId {
    type Error = CoreError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u32::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidAppId(raw.to_string()))
    }
}

impl From<AppId> for u32 {
    fn from(id: AppId) -> Self {
        id.0
    }
}

impl From<AppId> for i64 {
    fn from(id: AppId) -> Self {
        i64::from(id.0)
    }
}

impl FromStr for AppId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidAppId(s.to_string()))
    }
}

/// Credit roles listed in the storefront's "at a glance" block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Developer,
    Publisher,
    Franchise,
}

impl Role {
    /// Maps a row label such as `"Developer:"` or `"PUBLISHER"` to a role.
    ///
    /// The label is lower-cased and a trailing colon is stripped before
    /// matching. Unknown labels return `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().to_lowercase();
        match key.strip_suffix(':').unwrap_or(&key).trim() {
            "developer" => Some(Self::Developer),
            "publisher" => Some(Self::Publisher),
            "franchise" => Some(Self::Franchise),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Publisher => "publisher",
            Self::Franchise => "franchise",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed role → entity map. Inserting a role that is already present
/// overwrites the earlier name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperRoles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise: Option<String>,
}

impl DeveloperRoles {
    pub fn insert(&mut self, role: Role, name: impl Into<String>) {
        let slot = match role {
            Role::Developer => &mut self.developer,
            Role::Publisher => &mut self.publisher,
            Role::Franchise => &mut self.franchise,
        };
        *slot = Some(name.into());
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Developer => self.developer.as_deref(),
            Role::Publisher => self.publisher.as_deref(),
            Role::Franchise => self.franchise.as_deref(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.developer.is_none() && self.publisher.is_none() && self.franchise.is_none()
    }
}

/// Full metadata for one storefront item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub appid: AppId,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub developers: DeveloperRoles,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Edition name → price, two decimal places.
    #[serde(default)]
    pub editions: BTreeMap<String, Decimal>,
    /// `None` when the page has no features section at all; `Some(vec![])`
    /// when the section exists but lists nothing.
    pub features: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Lowest edition price, if any edition was priced.
    #[must_use]
    pub fn cheapest_edition(&self) -> Option<Decimal> {
        self.editions.values().min().copied()
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.editions.values().any(Decimal::is_zero)
    }
}

/// One position in the top-sellers chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub appid: AppId,
    pub title: String,
}

/// Row of the storefront's public app list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppListEntry {
    pub appid: u32,
    pub name: String,
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
