//! Time-ordered extraction
//!
//! A single composite section holds the primary news sub-table, a spacer,
//! and a secondary blog sub-table. Each item row reads:
//! - date from the first cell
//! - title and link from an anchor two levels down
//! - source label from a class token on the row

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::labels::label_from_class;
use super::{
    attr_or_empty, find_root, parse_base_url, resolve_link, text_at, Category, Extractor,
    FieldMap, RowMarker, Section,
};
use crate::document::{element_text, Document};
use crate::error::Result;
use crate::path::{children_named, Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOrderedLayout {
    /// CSS selector of the composite section
    pub root: String,
    /// Sub-tables to read, relative to root; spacers are left out
    pub sections: Vec<Section>,
    /// Has-data test for item rows
    pub row_marker: RowMarker,
    pub date: Path,
    pub title_anchor: Path,
    /// Element whose class carries the source token (root path = the row)
    pub label_from: Path,
    /// Preferred position of the source token in the class list
    pub label_token: usize,
    /// Resolve relative links against this URL when set
    pub base_url: Option<String>,
}

impl TimeOrderedLayout {
    pub const HEADERS: &'static [&'static str] = &["Date", "Title", "Link", "Source", "Category"];

    /// News at sub-table 0, spacer at 1, blogs at 2
    pub fn market() -> Self {
        Self::with_sections(vec![
            Section::new(Path::root().child("table", 0), Category::News),
            Section::new(Path::root().child("table", 2), Category::Blog),
        ])
    }

    /// News at sub-table 0, blogs directly after at 1
    pub fn stacked() -> Self {
        Self::with_sections(vec![
            Section::new(Path::root().child("table", 0), Category::News),
            Section::new(Path::root().child("table", 1), Category::Blog),
        ])
    }

    fn with_sections(sections: Vec<Section>) -> Self {
        let title_anchor = Path::root().child("td", 1).child("a", 0);
        Self {
            root: "#news".to_string(),
            sections,
            row_marker: RowMarker::Has(title_anchor.clone()),
            date: Path::root().child("td", 0),
            title_anchor,
            label_from: Path::root(),
            label_token: 1,
            base_url: None,
        }
    }
}

impl Default for TimeOrderedLayout {
    fn default() -> Self {
        Self::market()
    }
}

impl Extractor for TimeOrderedLayout {
    fn headers(&self) -> &'static [&'static str] {
        Self::HEADERS
    }

    fn extract(&self, document: &Document) -> Result<Vec<FieldMap>> {
        let root = find_root(document, &self.root)?;
        let base = parse_base_url(self.base_url.as_deref());
        let mut records = Vec::new();

        for section in &self.sections {
            let Some(table) = section.path.resolve(root) else {
                warn!(path = %section.path, "{} section not found, skipping", section.category.as_str());
                continue;
            };

            let before = records.len();
            for row in children_named(table, "tr") {
                if !self.row_marker.matches(row) {
                    continue;
                }

                let mut record = FieldMap::new();
                record.insert("Date".into(), Value::String(text_at(row, &self.date)));

                let (title, href) = match self.title_anchor.resolve(row) {
                    Some(anchor) => (element_text(anchor), attr_or_empty(anchor, "href")),
                    None => (String::new(), String::new()),
                };
                record.insert("Title".into(), Value::String(title));
                record.insert(
                    "Link".into(),
                    Value::String(resolve_link(&href, base.as_ref())),
                );

                // No class attribute at all: leave Source out of the record
                let class = self
                    .label_from
                    .resolve(row)
                    .and_then(|el| el.value().attr("class"));
                if let Some(class) = class {
                    let label = label_from_class(class, self.label_token);
                    record.insert("Source".into(), Value::String(label.to_string()));
                }

                record.insert(
                    "Category".into(),
                    Value::String(section.category.as_str().to_string()),
                );
                records.push(record);
            }

            debug!(
                category = section.category.as_str(),
                records = records.len() - before,
                "time-ordered section extracted"
            );
        }

        Ok(records)
    }
}
