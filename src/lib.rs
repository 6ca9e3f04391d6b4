//! Positional HTML table extraction
//!
//! Turns position-dependent HTML layouts into typed tables:
//! - Document loading with escape-artifact cleanup
//! - Declarative structural paths (`table[2]/tr[1]/td[0]`)
//! - Time-ordered and source-grouped extractors
//! - Row materialization under fixed headers
//! - Type coercion for percents, magnitudes and grouped integers
//! - Columnar text rendering plus CSV/JSON dumps
//! - FFI interface taking HTML bytes and a JSON request

pub mod coerce;
pub mod document;
pub mod error;
pub mod export;
pub mod extractors;
pub mod ffi;
pub mod logging;
pub mod lookup;
pub mod materialize;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod table;

pub use coerce::{coerce, coerce_with};
pub use document::Document;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use extractors::{Category, Extractor, FieldMap, SourceGroupedLayout, TimeOrderedLayout};
pub use ffi::*;
pub use lookup::{SemanticType, TypeLookup};
pub use materialize::materialize;
pub use path::Path;
pub use pipeline::{run, Request, Source};
pub use render::render;
pub use table::{Cell, Table};
