//! Source label dictionary
//!
//! News rows carry their outlet only as a class token (`is-7` and so on).

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Label used when a class attribute exists but no token is recognized
pub const UNKNOWN_SOURCE: &str = "Unknown";

static SOURCE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("is-1", "MarketWatch"),
        ("is-2", "WSJ"),
        ("is-3", "Reuters"),
        ("is-4", "Yahoo Finance"),
        ("is-5", "CNN"),
        ("is-6", "The New York Times"),
        ("is-7", "Bloomberg"),
        ("is-9", "BBC"),
        ("is-10", "CNBC"),
        ("is-11", "Fox Business"),
        ("is-102", "Mish's Global Economic Trend Analysis"),
        ("is-105", "Trader Feed"),
        ("is-113", "Howard Lindzon"),
        ("is-114", "Seeking Alpha"),
        ("is-121", "Zero Hedge"),
        ("is-123", "The Reformed Broker"),
        ("is-132", "Abnormal Returns"),
        ("is-134", "Calculated Risk"),
    ])
});

/// Look up a single class token
pub fn source_label(token: &str) -> Option<&'static str> {
    SOURCE_LABELS.get(token).copied()
}

/// Resolve a class attribute to a source label.
///
/// The token at `preferred` wins when recognized; otherwise the remaining
/// tokens are tried in order. Falls back to [`UNKNOWN_SOURCE`].
pub fn label_from_class(class_attr: &str, preferred: usize) -> &'static str {
    let tokens: Vec<&str> = class_attr.split_whitespace().collect();

    tokens
        .get(preferred)
        .and_then(|t| source_label(t))
        .or_else(|| tokens.iter().find_map(|t| source_label(t)))
        .unwrap_or(UNKNOWN_SOURCE)
}
