//! Human-readable market names derived from upload file names
//!
//! Market exports are named like `MarketshareNorthScottsdaleLuxury.xlsx`.
//! The rule table below turns that into `North Scottsdale Luxury`. Rules run
//! in a fixed order and each one sees the output of the previous rule.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

/// One substitution applied to the first match only
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Leading export prefixes, including a misspelling found in real uploads
static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)^(?:marketshare|makretshare)"));

static EXTENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)\.(?:csv|xlsx?|xls)$"));

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    [
        // word spacing
        (r"(?i)active", " Active "),
        (r"(?i)luxury", " Luxury "),
        (r"(?i)listings", " Listings "),
        // area names
        (r"(?i)NorthScottsdale", "North Scottsdale"),
        (r"(?i)CarefreeCaveCreekArea", "Carefree/Cave Creek Area"),
        (r"(?i)corridor", " Corridor"),
        (r"(?i)Scottsdale", "Scottsdale"),
        (r"(?i)Sedona", "Sedona"),
        (r"(?i)Tubac", "Tubac"),
        // abbreviations, upper-case tokens only
        (r"DH", "Desert Highlands"),
        (r"DM", "Desert Mountain"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| Rule {
        pattern: build(pattern),
        replacement,
    })
    .collect()
});

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("market name rule patterns are valid")
}

/// Derive a display title from a file name
///
/// Never returns an empty string: when every character is stripped away the
/// original file name is returned unchanged.
pub fn derive_market_name(file_name: &str) -> String {
    let mut name = EXTENSION_PATTERN
        .replace(file_name.trim(), "")
        .trim()
        .to_string();

    while let Some(found) = PREFIX_PATTERN.find(&name) {
        if found.is_empty() {
            break;
        }
        name.replace_range(found.range(), "");
    }

    for rule in RULES.iter() {
        name = rule
            .pattern
            .replace(&name, NoExpand(rule.replacement))
            .into_owned();
    }

    let titled = name
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ");

    if titled.is_empty() {
        file_name.to_string()
    } else {
        titled
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
