//! Catalog search filters.
//!
//! Criteria are OR-combined: an entry matches when any populated criterion
//! matches. The optional price range is AND-ed on top and is satisfied when
//! at least one edition price falls inside it. String comparisons are
//! case-insensitive.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::catalog::{AppId, CatalogEntry, Role};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFilter {
    pub appid: Option<AppId>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub price: Option<PriceRange>,
}

/// Inclusive edition price bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

impl GameFilter {
    /// `true` when no criterion at all is set, including the price range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_criteria() && self.price.is_none()
    }

    /// `true` when at least one OR-criterion is set.
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        self.appid.is_some()
            || self.title.is_some()
            || self.description.is_some()
            || self.release_date.is_some()
            || !self.developers.is_empty()
            || !self.publishers.is_empty()
            || !self.tags.is_empty()
            || !self.features.is_empty()
    }

    /// Evaluates the filter against one entry.
    ///
    /// With no OR-criteria every entry passes the first stage, so a filter
    /// holding only a price range matches on price alone.
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let criteria_match = !self.has_criteria() || self.any_criterion_matches(entry);
        let price_match = self
            .price
            .is_none_or(|range| entry.editions.values().any(|p| range.contains(*p)));
        criteria_match && price_match
    }

    fn any_criterion_matches(&self, entry: &CatalogEntry) -> bool {
        if self.appid == Some(entry.appid) {
            return true;
        }
        if self
            .title
            .as_deref()
            .is_some_and(|needle| contains_ci(&entry.title, needle))
        {
            return true;
        }
        if let (Some(needle), Some(description)) = (&self.description, &entry.description) {
            if contains_ci(description, needle) {
                return true;
            }
        }
        if self.release_date.is_some() && self.release_date == entry.release_date {
            return true;
        }
        if role_in(entry, Role::Developer, &self.developers)
            || role_in(entry, Role::Publisher, &self.publishers)
        {
            return true;
        }
        if any_eq_ci(&entry.tags, &self.tags) {
            return true;
        }
        entry
            .features
            .as_deref()
            .is_some_and(|features| any_eq_ci(features, &self.features))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn role_in(entry: &CatalogEntry, role: Role, wanted: &[String]) -> bool {
    entry
        .developers
        .get(role)
        .is_some_and(|name| wanted.iter().any(|w| eq_ci(w, name)))
}

fn any_eq_ci(values: &[String], wanted: &[String]) -> bool {
    values
        .iter()
        .any(|v| wanted.iter().any(|w| eq_ci(w, v)))
}

fn eq_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
