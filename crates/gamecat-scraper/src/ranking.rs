//! Top-sellers chart parsing.

use std::collections::HashSet;
use std::sync::LazyLock;

use gamecat_core::{AppId, RankEntry, MAX_RANKING_SIZE};
use regex::Regex;

static APP_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"app/(\d+)/(\w+)").expect("valid regex"));

/// Storefront hardware listing that shows up in the chart but is not a game.
pub const HARDWARE_APPID: u32 = 1_675_200;

/// `true` once the rendered chart contains at least one link that
/// [`parse_chart`] would rank. The hardware listing alone does not count.
#[must_use]
pub fn has_rankable_links(markup: &str) -> bool {
    APP_LINK_RE
        .captures_iter(markup)
        .filter_map(|caps| caps[1].parse::<u32>().ok().and_then(AppId::new))
        .any(|appid| appid.get() != HARDWARE_APPID)
}

/// Scans rendered chart markup for `app/<id>/<slug>` links in document order.
///
/// Slugs become display titles with underscores turned into spaces. The
/// hardware listing is skipped, repeated ids keep their first position and
/// at most [`MAX_RANKING_SIZE`] entries are returned.
#[must_use]
pub fn parse_chart(markup: &str) -> Vec<RankEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for caps in APP_LINK_RE.captures_iter(markup) {
        let Some(appid) = caps[1].parse::<u32>().ok().and_then(AppId::new) else {
            continue;
        };
        if appid.get() == HARDWARE_APPID || !seen.insert(appid) {
            continue;
        }
        entries.push(RankEntry {
            appid,
            title: caps[2].replace('_', " "),
        });
        if entries.len() == MAX_RANKING_SIZE {
            break;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(appid: u32, slug: &str) -> String {
        format!(r#"<a href="https://store.steampowered.com/app/{appid}/{slug}/">x</a>"#)
    }

    #[test]
    fn parses_links_in_document_order() {
        let markup = format!(
            "{}{}{}",
            link(730, "CounterStrike_2"),
            link(570, "Dota_2"),
            link(1_086_940, "Baldurs_Gate_3")
        );
        let entries = parse_chart(&markup);
        let ids: Vec<u32> = entries.iter().map(|e| e.appid.get()).collect();
        assert_eq!(ids, vec![730, 570, 1_086_940]);
        assert_eq!(entries[0].title, "CounterStrike 2");
        assert_eq!(entries[2].title, "Baldurs Gate 3");
    }

    #[test]
    fn hardware_listing_is_excluded() {
        let markup = format!("{}{}", link(HARDWARE_APPID, "Steam_Deck"), link(730, "CS2"));
        let entries = parse_chart(&markup);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].appid.get(), 730);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let markup = format!(
            "{}{}{}",
            link(730, "CS2"),
            link(570, "Dota_2"),
            link(730, "CS2_again")
        );
        let entries = parse_chart(&markup);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "CS2");
    }

    #[test]
    fn never_returns_more_than_the_cap() {
        let markup: String = (1..=150).map(|id| link(id, "Game")).collect();
        let entries = parse_chart(&markup);
        assert_eq!(entries.len(), MAX_RANKING_SIZE);
        assert_eq!(entries.last().unwrap().appid.get(), 99);
    }

    #[test]
    fn zero_appid_is_ignored() {
        let markup = format!("{}{}", link(0, "Bogus"), link(10, "CS"));
        let entries = parse_chart(&markup);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn detects_presence_of_links() {
        assert!(!has_rankable_links("<div>loading…</div>"));
        assert!(has_rankable_links(&link(10, "CS")));
    }

    #[test]
    fn hardware_link_alone_is_not_rankable() {
        let hardware = link(HARDWARE_APPID, "Steam_Deck");
        assert!(!has_rankable_links(&hardware));
        assert!(!has_rankable_links(&link(0, "Bogus")));
        assert!(has_rankable_links(&format!("{hardware}{}", link(730, "CS2"))));
    }
}
