//! Keyword tables and the detectors that read a normalized query against them.
//!
//! Every detector is a plain substring check over the lower-cased query.
//! Adding a trigger word is a table edit.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Gender;

pub const WOMEN_KEYWORDS: &[&str] = &["women", "woman", "female", "ladies", "girls"];
pub const MEN_KEYWORDS: &[&str] = &["men", "man", "male", "boys", "guys"];

/// Ceiling used for "cheap" and "affordable".
pub const BUDGET_CEILING: u64 = 1000;

/// Maps trigger words to one canonical catalog value.
pub struct Trigger {
    pub words: &'static [&'static str],
    pub canonical: &'static str,
    /// The trigger is ignored when any of these appear anywhere in the query.
    pub unless: &'static [&'static str],
}

const fn trigger(words: &'static [&'static str], canonical: &'static str) -> Trigger {
    Trigger {
        words,
        canonical,
        unless: &[],
    }
}

pub const CATEGORY_TRIGGERS: &[Trigger] = &[
    trigger(&["kurti"], "Kurti"),
    trigger(&["shirt", "shirts"], "T-Shirt"),
    trigger(&["hoodie"], "Hoodie"),
    Trigger {
        words: &["top"],
        canonical: "Top",
        unless: &["laptop"],
    },
    trigger(&["jeans"], "Jeans"),
    trigger(&["dress"], "Dress"),
    trigger(&["blazer"], "Blazer"),
    trigger(&["sweater"], "Sweater"),
    trigger(&["shorts"], "Shorts"),
];

pub const STYLE_TRIGGERS: &[Trigger] = &[
    trigger(&["party", "partywear", "party wear"], "Party Wear"),
    trigger(&["formal"], "Formal"),
    trigger(&["casual"], "Casual"),
    trigger(&["ethnic"], "Ethnic"),
    trigger(&["sport", "sports", "gym"], "Sportswear"),
    trigger(&["street", "streetwear"], "Streetwear"),
];

pub const COLOUR_KEYWORDS: &[&str] = &[
    "red", "blue", "green", "pink", "yellow", "black", "white", "grey", "gray", "orange", "golden",
    "beige",
];

// Tried in order, the first hit decides the ceiling.
static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"under\s*₹?(\d+)",
        r"below\s*₹?(\d+)",
        r"less\s*than\s*₹?(\d+)",
        r"within\s*₹?(\d+)",
        r"budget\s*₹?(\d+)",
        r"₹?(\d+)\s*or\s*less",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

const BUDGET_WORDS: &[&str] = &["cheap", "affordable"];

/// Everything the engine reads out of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryIntent {
    pub gender: Option<Gender>,
    pub categories: Vec<&'static str>,
    pub styles: Vec<&'static str>,
    pub max_price: Option<u64>,
    pub colours: Vec<&'static str>,
}

impl QueryIntent {
    /// `query` must already be lower-cased.
    pub fn detect(query: &str) -> Self {
        Self {
            gender: detect_gender(query),
            categories: detect_triggers(query, CATEGORY_TRIGGERS),
            styles: detect_triggers(query, STYLE_TRIGGERS),
            max_price: detect_max_price(query),
            colours: detect_colours(query),
        }
    }
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Women keywords win outright; men keywords only count when no women
/// keyword is present.
pub fn detect_gender(query: &str) -> Option<Gender> {
    if contains_any(query, WOMEN_KEYWORDS) {
        Some(Gender::Women)
    } else if contains_any(query, MEN_KEYWORDS) {
        Some(Gender::Men)
    } else {
        None
    }
}

pub fn detect_triggers(query: &str, table: &[Trigger]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|rule| contains_any(query, rule.words) && !contains_any(query, rule.unless))
        .map(|rule| rule.canonical)
        .collect()
}

pub fn detect_max_price(query: &str) -> Option<u64> {
    for pattern in PRICE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(query) {
            if let Some(amount) = captures.get(1).and_then(|m| m.as_str().parse().ok()) {
                return Some(amount);
            }
        }
    }

    contains_any(query, BUDGET_WORDS).then_some(BUDGET_CEILING)
}

pub fn detect_colours(query: &str) -> Vec<&'static str> {
    COLOUR_KEYWORDS
        .iter()
        .copied()
        .filter(|colour| query.contains(colour))
        .collect()
}

fn contains_any(query: &str, words: &[&str]) -> bool {
    words.iter().any(|word| query.contains(word))
}
