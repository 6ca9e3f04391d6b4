//! Source-grouped extraction
//!
//! The page is split into top-level groups (news, spacer, blogs). Inside a
//! group, rows with an `align` attribute hold column blocks; each block
//! starts with a caption row, then a row naming the outlet, then one row per
//! article.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    attr_or_empty, find_root, parse_base_url, resolve_link, text_at, Category, Extractor,
    FieldMap, RowMarker, Section,
};
use crate::document::{element_text, Document};
use crate::error::Result;
use crate::path::{children_named, Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceGroupedLayout {
    pub root: String,
    /// Top-level groups relative to root; the spacer group is left out
    pub groups: Vec<Section>,
    /// Marker of rows that hold column blocks
    pub block_marker: RowMarker,
    /// From a column block (`td`) to the element holding its rows
    pub block_rows: Path,
    /// Position of the outlet row within a block
    pub source_row: usize,
    /// Outlet anchor, relative to the outlet row
    pub source_anchor: Path,
    /// Has-data test for article rows
    pub article_marker: RowMarker,
    pub date: Path,
    pub title_anchor: Path,
    pub base_url: Option<String>,
}

impl SourceGroupedLayout {
    pub const HEADERS: &'static [&'static str] =
        &["Date", "Title", "Link", "Source", "Source URL", "Category"];

    /// Groups at indices 0 and 2 with a spacer at 1
    pub fn by_source() -> Self {
        let title_anchor = Path::root().child("td", 1).child("a", 0);
        Self {
            root: "#news".to_string(),
            groups: vec![
                Section::new(Path::root().child("table", 0), Category::News),
                Section::new(Path::root().child("table", 2), Category::Blog),
            ],
            block_marker: RowMarker::Attribute("align".to_string()),
            block_rows: Path::root().child("table", 0),
            source_row: 1,
            source_anchor: Path::root()
                .child("td", 0)
                .child("table", 0)
                .child("tr", 0)
                .child("td", 0)
                .child("a", 0),
            article_marker: RowMarker::Has(title_anchor.clone()),
            date: Path::root().child("td", 0),
            title_anchor,
            base_url: None,
        }
    }
}

impl Default for SourceGroupedLayout {
    fn default() -> Self {
        Self::by_source()
    }
}

impl Extractor for SourceGroupedLayout {
    fn headers(&self) -> &'static [&'static str] {
        Self::HEADERS
    }

    fn extract(&self, document: &Document) -> Result<Vec<FieldMap>> {
        let root = find_root(document, &self.root)?;
        let base = parse_base_url(self.base_url.as_deref());
        let mut records = Vec::new();

        for group in &self.groups {
            let Some(group_table) = group.path.resolve(root) else {
                warn!(path = %group.path, "{} group not found, skipping", group.category.as_str());
                continue;
            };

            let before = records.len();
            let block_rows = children_named(group_table, "tr")
                .into_iter()
                .filter(|row| self.block_marker.matches(*row));

            for block_row in block_rows {
                for block in children_named(block_row, "td") {
                    let Some(container) = self.block_rows.resolve(block) else {
                        continue;
                    };
                    let rows = children_named(container, "tr");

                    let (source, source_url) = rows
                        .get(self.source_row)
                        .and_then(|row| self.source_anchor.resolve(*row))
                        .map(|a| (element_text(a), attr_or_empty(a, "href")))
                        .unwrap_or_default();
                    let source_url = resolve_link(&source_url, base.as_ref());

                    for row in rows.iter().skip(self.source_row + 1) {
                        if !self.article_marker.matches(*row) {
                            continue;
                        }

                        let (title, href) = match self.title_anchor.resolve(*row) {
                            Some(a) => (element_text(a), attr_or_empty(a, "href")),
                            None => (String::new(), String::new()),
                        };

                        let mut record = FieldMap::new();
                        record.insert("Date".into(), Value::String(text_at(*row, &self.date)));
                        record.insert("Title".into(), Value::String(title));
                        record.insert(
                            "Link".into(),
                            Value::String(resolve_link(&href, base.as_ref())),
                        );
                        record.insert("Source".into(), Value::String(source.clone()));
                        record.insert("Source URL".into(), Value::String(source_url.clone()));
                        record.insert(
                            "Category".into(),
                            Value::String(group.category.as_str().to_string()),
                        );
                        records.push(record);
                    }
                }
            }

            debug!(
                category = group.category.as_str(),
                records = records.len() - before,
                "source-grouped section extracted"
            );
        }

        Ok(records)
    }
}
