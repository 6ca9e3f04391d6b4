//! Positional table extractors
//!
//! Each strategy walks a [`Document`] through fixed structural paths and
//! produces one [`FieldMap`] per logical record:
//! - time-ordered: dated news/blog items listed in sub-tables
//! - source-grouped: items grouped under a per-outlet header row

mod labels;
mod source_grouped;
mod time_ordered;

pub use labels::*;
pub use source_grouped::*;
pub use time_ordered::*;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::document::{element_text, Document};
use crate::error::{Error, Result};
use crate::path::Path;

/// One record's raw values, keyed by column name
pub type FieldMap = Map<String, Value>;

/// Explicit record discriminant, declared alongside each section path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Blog,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Blog => "blog",
        }
    }
}

/// A sub-table or group to visit, relative to the layout root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub path: Path,
    pub category: Category,
}

impl Section {
    pub fn new(path: Path, category: Category) -> Self {
        Self { path, category }
    }
}

/// Predicate telling data rows apart from structural spacers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMarker {
    /// Row carries a non-empty attribute
    Attribute(String),
    /// Path resolves from the row
    Has(Path),
}

impl RowMarker {
    pub fn matches(&self, row: ElementRef<'_>) -> bool {
        match self {
            RowMarker::Attribute(name) => row
                .value()
                .attr(name)
                .is_some_and(|v| !v.trim().is_empty()),
            RowMarker::Has(path) => path.resolve(row).is_some(),
        }
    }
}

/// Common interface of the extraction strategies
pub trait Extractor {
    /// Column order for records produced by this strategy
    fn headers(&self) -> &'static [&'static str];

    /// Walk the document and collect one field map per record
    fn extract(&self, document: &Document) -> Result<Vec<FieldMap>>;
}

/// Locate the layout root or report the missing landmark
fn find_root<'a>(document: &'a Document, selector: &str) -> Result<ElementRef<'a>> {
    document
        .select_first(selector)?
        .ok_or_else(|| Error::structure(selector))
}

/// Text at `path`, or empty string when the path does not resolve
fn text_at(el: ElementRef<'_>, path: &Path) -> String {
    path.resolve(el).map(element_text).unwrap_or_default()
}

/// Attribute value, or empty string when absent
fn attr_or_empty(el: ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or("").trim().to_string()
}

/// Resolve a link against an optional base URL; unresolvable links stay as-is
fn resolve_link(href: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) if !href.is_empty() => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        _ => href.to_string(),
    }
}

/// Parse an optional base URL from layout configuration
fn parse_base_url(base_url: Option<&str>) -> Option<Url> {
    let raw = base_url?;
    match Url::parse(raw) {
        Ok(u) => Some(u),
        Err(e) => {
            tracing::warn!("ignoring invalid base URL {raw}: {e}");
            None
        }
    }
}
