//! Free-text criteria parsing.
//!
//! One criterion per line, `label: weight` or `label - weight`, or a bare
//! label with no weight. Lines with an unparseable weight fall back to the
//! whole line as a bare label.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::Criterion;

static WEIGHTED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s*[:\-]\s*(\d+(?:\.\d+)?)\s*$").unwrap());

/// Parse the criteria textarea into payload criteria. Empty input → None.
pub fn parse_criteria(text: &str) -> Option<Vec<Criterion>> {
    let criteria: Vec<Criterion> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match WEIGHTED_LINE.captures(line) {
            Some(caps) => Criterion {
                criterion: caps[1].to_string(),
                weight: caps[2].parse().ok(),
            },
            None => Criterion {
                criterion: line.to_string(),
                weight: None,
            },
        })
        .collect();

    if criteria.is_empty() {
        None
    } else {
        Some(criteria)
    }
}
