//! Table model
//!
//! A named grid of cells under a header list. Every cell starts as text;
//! coercion rewrites whole columns into numbers or the `NaN` sentinel.

use std::fmt;

use crate::lookup::SemanticType;
use crate::materialize::{MISSING, NAN};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Float(f64),
    Int(i64),
    /// Missing, unparseable, or zero after coercion
    NaN,
}

impl Cell {
    pub fn is_nan(&self) -> bool {
        matches!(self, Cell::NaN)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::NaN => f.write_str(NAN),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    /// `None` until the column has been coerced
    types: Vec<Option<SemanticType>>,
    error: Option<String>,
}

impl Table {
    /// Build from materialized rows (`rows[0]` is the header row).
    ///
    /// Short rows are padded with the missing sentinel and long rows cut to
    /// the header width.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let mut iter = rows.into_iter();
        let headers = iter.next().unwrap_or_default();
        let width = headers.len();

        let rows = iter
            .map(|row| {
                let mut cells: Vec<Cell> = row.into_iter().take(width).map(Cell::Text).collect();
                cells.resize(width, Cell::Text(MISSING.to_string()));
                cells
            })
            .collect();

        Self {
            name: name.into(),
            types: vec![None; width],
            headers,
            rows,
            error: None,
        }
    }

    /// Placeholder for a pipeline run that failed
    pub fn failed(name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            types: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn types(&self) -> &[Option<SemanticType>] {
        &self.types
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// (data rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// Type label for the rendered type row
    pub fn type_label(&self, col: usize) -> &'static str {
        self.types
            .get(col)
            .copied()
            .flatten()
            .map_or("string", |t| t.storage())
    }

    pub(crate) fn column_cells_mut(&mut self, col: usize) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.iter_mut().filter_map(move |row| row.get_mut(col))
    }

    pub(crate) fn set_type(&mut self, col: usize, kind: SemanticType) {
        if let Some(slot) = self.types.get_mut(col) {
            *slot = Some(kind);
        }
    }
}
