//! Flat CSV and JSON dumps of a table

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::Result;
use crate::render::render;
use crate::table::{Cell, Table};

/// Output formats for a finished table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    /// Columnar text, as rendered for a terminal
    Text,
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_csv_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    writeln!(w)
}

/// One comma-separated line per row, header first
pub fn write_csv<W: Write>(table: &Table, mut w: W) -> Result<()> {
    write_csv_row(&mut w, table.headers())?;
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
        write_csv_row(&mut w, &cells)?;
    }
    w.flush()?;
    Ok(())
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Int(v) => Value::from(*v),
        Cell::NaN => Value::Null,
    }
}

/// Array of per-row objects keyed by header
pub fn to_json(table: &Table) -> Value {
    let records = table
        .rows()
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = table
                .headers()
                .iter()
                .zip(row)
                .map(|(h, c)| (h.clone(), cell_to_json(c)))
                .collect();
            Value::Object(obj)
        })
        .collect();
    Value::Array(records)
}

pub fn write_json<W: Write>(table: &Table, mut w: W) -> Result<()> {
    serde_json::to_writer(&mut w, &to_json(table))?;
    w.flush()?;
    Ok(())
}

/// Render a table to a string in the given format
pub fn to_string(table: &Table, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(render(table)),
        ExportFormat::Json => Ok(serde_json::to_string(&to_json(table))?),
        ExportFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(table, &mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
    }
}

/// Write a flat dump to `path`
pub fn save(table: &Table, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(table, &mut w)?,
        ExportFormat::Json => write_json(table, &mut w)?,
        ExportFormat::Text => {
            w.write_all(render(table).as_bytes())?;
            w.flush()?;
        }
    }
    debug!(path = %path.display(), ?format, rows = table.rows().len(), "saved table");
    Ok(())
}
