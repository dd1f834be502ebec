//! Metadata extraction from a storefront item page.
//!
//! Each field has its own policy: title, description and release date are
//! required and fail the whole extraction; developers, tags, editions and
//! features degrade to empty values. A broken purchase block is skipped and
//! counted rather than failing the page.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use gamecat_core::{AppId, CatalogEntry, DeveloperRoles, Role};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Field, ScraperError};
use crate::price::{cents_to_money, clean_edition_name, leading_digits, parse_cents};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.apphub_AppName"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| selector("div.game_description_snippet"));
static GLANCE: LazyLock<Selector> = LazyLock::new(|| selector("div.glance_details"));
static RELEASE_DATE: LazyLock<Selector> = LazyLock::new(|| selector("div.date"));
static DEV_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| selector("div.glance_ctn_responsive_left"));
static DEV_ROW: LazyLock<Selector> = LazyLock::new(|| selector("div.dev_row"));
static DEV_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("div.subtitle.column"));
static DEV_LINK: LazyLock<Selector> = LazyLock::new(|| selector("div.summary.column a"));
static TAG_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div.rightcol"));
static TAG: LazyLock<Selector> = LazyLock::new(|| selector("a.app_tag"));
static PURCHASE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| selector("div.game_area_purchase_game_wrapper, div.game_area_purchase"));
static EDITION_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h2.title"));
static PURCHASE_ACTION: LazyLock<Selector> =
    LazyLock::new(|| selector("div.game_purchase_action"));
static PRICE_CONTAINERS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        selector("div.game_purchase_price"),
        selector("div.discount_block.game_purchase_discount"),
        selector("div.discount_block.game_purchase_discount.no_discount"),
    ]
});
static YOUR_PRICE: LazyLock<Selector> = LazyLock::new(|| selector("div.your_price_label"));
static FEATURES: LazyLock<Selector> =
    LazyLock::new(|| selector("div.game_area_features_list_ctn"));
static FEATURE_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("div.label"));

const RELEASE_DATE_FORMAT: &str = "%d %b, %Y";
const FREE_TO_PLAY: &str = "free to play";

/// A parsed catalog entry plus the number of purchase blocks that had to be
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub entry: CatalogEntry,
    pub skipped_editions: usize,
}

/// Extracts a [`CatalogEntry`] for `appid` from the page markup.
///
/// # Errors
///
/// - [`ScraperError::ExtractionFailed`] when the title, both description
///   containers, or the release-date container are missing.
/// - [`ScraperError::MalformedField`] when the release date does not match
///   `day month, year`.
pub fn extract_entry(appid: AppId, html: &str) -> Result<Extraction, ScraperError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, &TITLE)
        .filter(|t| !t.is_empty())
        .ok_or(ScraperError::ExtractionFailed {
            appid,
            field: Field::Title,
        })?;

    let description = first_text(&document, &SNIPPET)
        .or_else(|| first_text(&document, &GLANCE))
        .ok_or(ScraperError::ExtractionFailed {
            appid,
            field: Field::Description,
        })?;

    let release_date = extract_release_date(appid, &document)?;
    let developers = extract_developers(&document);
    let tags = extract_tags(&document);
    let (editions, skipped_editions) = extract_editions(appid, &document);
    let features = extract_features(&document);

    if skipped_editions > 0 {
        tracing::warn!(
            appid = %appid,
            skipped = skipped_editions,
            kept = editions.len(),
            "skipped unparseable purchase blocks"
        );
    }

    Ok(Extraction {
        entry: CatalogEntry {
            appid,
            title,
            description: Some(description),
            release_date: Some(release_date),
            developers,
            tags,
            editions,
            features,
        },
        skipped_editions,
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(text_of)
}

fn extract_release_date(appid: AppId, document: &Html) -> Result<NaiveDate, ScraperError> {
    let raw = first_text(document, &RELEASE_DATE).ok_or(ScraperError::ExtractionFailed {
        appid,
        field: Field::ReleaseDate,
    })?;
    NaiveDate::parse_from_str(&raw, RELEASE_DATE_FORMAT).map_err(|_| {
        ScraperError::MalformedField {
            appid,
            field: Field::ReleaseDate,
            value: raw,
        }
    })
}

fn extract_developers(document: &Html) -> DeveloperRoles {
    let mut roles = DeveloperRoles::default();
    let Some(container) = document.select(&DEV_CONTAINER).next() else {
        return roles;
    };

    for row in container.select(&DEV_ROW) {
        let Some(role) = row
            .select(&DEV_LABEL)
            .next()
            .and_then(|label| Role::from_label(&text_of(label)))
        else {
            continue;
        };
        if let Some(link) = row.select(&DEV_LINK).next() {
            roles.insert(role, text_of(link));
        }
    }
    roles
}

fn extract_tags(document: &Html) -> Vec<String> {
    document
        .select(&TAG_CONTAINER)
        .next()
        .map(|container| container.select(&TAG).map(text_of).collect())
        .unwrap_or_default()
}

fn extract_editions(appid: AppId, document: &Html) -> (BTreeMap<String, Decimal>, usize) {
    let mut editions = BTreeMap::new();
    let mut skipped = 0;

    for block in document.select(&PURCHASE_BLOCK) {
        match extract_edition(block) {
            Ok((name, price)) => {
                editions.insert(name, price);
            }
            Err(reason) => {
                tracing::debug!(appid = %appid, reason, "skipping purchase block");
                skipped += 1;
            }
        }
    }
    (editions, skipped)
}

fn extract_edition(block: ElementRef<'_>) -> Result<(String, Decimal), &'static str> {
    let heading = block
        .select(&EDITION_TITLE)
        .next()
        .ok_or("missing edition heading")?;
    let name = clean_edition_name(&text_of(heading));
    if name.is_empty() {
        return Err("empty edition name");
    }

    let action = block
        .select(&PURCHASE_ACTION)
        .next()
        .ok_or("missing purchase action")?;
    if text_of(action).to_lowercase().contains(FREE_TO_PLAY) {
        return Ok((name, cents_to_money(0)));
    }

    let container = PRICE_CONTAINERS
        .iter()
        .find_map(|sel| block.select(sel).next())
        .ok_or("no price container")?;

    let price = if let Some(raw) = container.value().attr("data-price-final") {
        parse_cents(raw).ok_or("non-numeric data-price-final")?
    } else {
        let label = container
            .select(&YOUR_PRICE)
            .next()
            .or_else(|| block.select(&YOUR_PRICE).next())
            .ok_or("no price attribute or label")?;
        let text = text_of(label);
        let digits = leading_digits(&text).ok_or("price label has no digits")?;
        parse_cents(digits).ok_or("price label out of range")?
    };

    Ok((name, price))
}

fn extract_features(document: &Html) -> Option<Vec<String>> {
    let container = document.select(&FEATURES).next()?;
    Some(container.select(&FEATURE_LABEL).map(text_of).collect())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
