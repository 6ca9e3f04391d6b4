//! Loader → extractor → materializer → coercion wiring
//!
//! Each call owns its document and table; nothing is shared between runs
//! except the read-only lookup dictionaries.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coerce::coerce;
use crate::document::Document;
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::extractors::{Extractor, SourceGroupedLayout, TimeOrderedLayout};
use crate::materialize::materialize;
use crate::table::Table;

/// Which extraction strategy to run, with its layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    TimeOrdered(TimeOrderedLayout),
    SourceGrouped(SourceGroupedLayout),
}

impl Source {
    pub fn extractor(&self) -> &dyn Extractor {
        match self {
            Source::TimeOrdered(layout) => layout,
            Source::SourceGrouped(layout) => layout,
        }
    }

    /// Default table name
    pub fn name(&self) -> &'static str {
        match self {
            Source::TimeOrdered(_) => "news",
            Source::SourceGrouped(_) => "news by source",
        }
    }
}

/// JSON request accepted over the FFI boundary
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub source: Source,
    /// Run type coercion on the materialized table
    #[serde(default)]
    pub coerce: bool,
    #[serde(default)]
    pub format: ExportFormat,
    /// Table name; defaults to the source's name
    #[serde(default)]
    pub name: Option<String>,
}

/// Run the pipeline over a byte payload
pub fn run(payload: &[u8], source: &Source, coerce_types: bool) -> Result<Table> {
    let document = Document::from_bytes(payload)?;
    run_document(&document, source, source.name(), coerce_types)
}

/// Run the pipeline over an already parsed document
pub fn run_document(
    document: &Document,
    source: &Source,
    name: &str,
    coerce_types: bool,
) -> Result<Table> {
    let extractor = source.extractor();
    let records = extractor.extract(document)?;
    let rows = materialize(extractor.headers(), records)?;

    let mut table = Table::from_rows(name, rows);
    if coerce_types {
        coerce(&mut table);
    }

    let (r, c) = table.shape();
    info!(table = name, rows = r, columns = c, "extracted table");
    Ok(table)
}

/// Run a JSON-described request and format the result
pub fn run_request(payload: &[u8], request: &Request) -> Result<String> {
    let document = Document::from_bytes(payload)?;
    let name = request.name.as_deref().unwrap_or(request.source.name());
    let table = run_document(&document, &request.source, name, request.coerce)?;
    export::to_string(&table, request.format)
}
