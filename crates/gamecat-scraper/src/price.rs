//! Edition name and price normalisation for storefront purchase blocks.

use rust_decimal::Decimal;

const EDITION_PREFIXES: [&str; 3] = ["Buy", "Pre-Purchase", "Play"];
const BUNDLE_MARKER: &str = "BUNDLE";

/// Converts an integer-cents amount into a two-place monetary value.
#[must_use]
pub fn cents_to_money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Parses a raw cents string such as `"1999"` into `19.99`.
///
/// Returns `None` for anything that is not a non-negative integer.
#[must_use]
pub fn parse_cents(raw: &str) -> Option<Decimal> {
    let cents: u32 = raw.trim().parse().ok()?;
    Some(cents_to_money(i64::from(cents)))
}

/// Returns the first run of ASCII digits in `text`.
#[must_use]
pub fn leading_digits(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Normalises a purchase-block heading into an edition name.
///
/// Each of `Buy`, `Pre-Purchase` and `Play` is stripped when the (running)
/// name starts with it; anything from `BUNDLE` onwards is dropped.
#[must_use]
pub fn clean_edition_name(heading: &str) -> String {
    let mut name = heading.trim();
    for prefix in EDITION_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    if let Some((before, _)) = name.split_once(BUNDLE_MARKER) {
        name = before;
    }
    name.trim().to_string()
}
