//! Type coercion
//!
//! Rewrites a table column by column according to the type lookup. Columns
//! with no lookup entry are left alone.
//!
//! A cell that fails to parse and a cell that parses to zero both become
//! [`Cell::NaN`]. That loses real zeros (a 0% dividend reads as missing);
//! it is kept because downstream consumers rely on it.
//!
//! Only [`Cell::Text`] is converted. Typed cells and `NaN` pass through, so
//! coercing twice gives the same table.

use tracing::debug;

use crate::lookup::{SemanticType, TypeLookup};
use crate::materialize::MISSING;
use crate::table::{Cell, Table};

/// Coerce with the built-in lookup
pub fn coerce(table: &mut Table) {
    coerce_with(table, TypeLookup::builtin());
}

pub fn coerce_with(table: &mut Table, lookup: &TypeLookup) {
    for col in 0..table.headers().len() {
        let Some(kind) = lookup.get(&table.headers()[col]) else {
            continue;
        };

        let mut nan = 0usize;
        for cell in table.column_cells_mut(col) {
            if let Cell::Text(raw) = cell {
                *cell = convert(raw, kind);
                if cell.is_nan() {
                    nan += 1;
                }
            }
        }
        table.set_type(col, kind);

        debug!(column = %table.headers()[col], ?kind, nan, "coerced column");
    }
}

/// Convert one raw string per its semantic type
pub fn convert(raw: &str, kind: SemanticType) -> Cell {
    let s = raw.trim();
    match kind {
        SemanticType::Percent => {
            let number = s.strip_suffix('%').unwrap_or(s);
            float_cell(parse_float(number).map(|v| v / 100.0))
        }
        SemanticType::Float => float_cell(parse_float(s)),
        SemanticType::MagnitudeInt => int_cell(parse_magnitude(s)),
        SemanticType::GroupedInt => int_cell(s.replace(',', "").parse().ok()),
        SemanticType::Int => int_cell(s.parse().ok()),
        SemanticType::String => {
            if s == MISSING {
                Cell::NaN
            } else {
                Cell::Text(raw.to_string())
            }
        }
    }
}

/// Finite float, or `None`
fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `1.2B`, `500K`, `3M`; a bare number is truncated without scaling
fn parse_magnitude(s: &str) -> Option<i64> {
    let (number, scale) = match s.chars().last()? {
        'B' => (&s[..s.len() - 1], 1e9),
        'M' => (&s[..s.len() - 1], 1e6),
        'K' => (&s[..s.len() - 1], 1e3),
        _ => (s, 1.0),
    };

    let scaled = parse_float(number)? * scale;
    // Binary rounding can leave 1.2 * 1e9 a hair under the integer
    let nearest = scaled.round();
    let truncated = if (scaled - nearest).abs() < 1e-6 {
        nearest
    } else {
        scaled.trunc()
    };

    if truncated.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

fn float_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) if v != 0.0 => Cell::Float(v),
        _ => Cell::NaN,
    }
}

fn int_cell(value: Option<i64>) -> Cell {
    match value {
        Some(v) if v != 0 => Cell::Int(v),
        _ => Cell::NaN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &[&[&str]]) -> Table {
        Table::from_rows(
            "screener",
            data.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_percent() {
        assert_eq!(convert("12.5%", SemanticType::Percent), Cell::Float(0.125));
        assert_eq!(convert("-2.5%", SemanticType::Percent), Cell::Float(-0.025));
        assert_eq!(convert("0%", SemanticType::Percent), Cell::NaN);
        assert_eq!(convert("-", SemanticType::Percent), Cell::NaN);
        assert_eq!(convert("abc%", SemanticType::Percent), Cell::NaN);
    }

    #[test]
    fn test_float() {
        assert_eq!(convert("23.41", SemanticType::Float), Cell::Float(23.41));
        assert_eq!(convert("0.00", SemanticType::Float), Cell::NaN);
        assert_eq!(convert("NaN", SemanticType::Float), Cell::NaN);
        assert_eq!(convert("inf", SemanticType::Float), Cell::NaN);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(convert("1.2B", SemanticType::MagnitudeInt), Cell::Int(1_200_000_000));
        assert_eq!(convert("500K", SemanticType::MagnitudeInt), Cell::Int(500_000));
        assert_eq!(convert("2.35M", SemanticType::MagnitudeInt), Cell::Int(2_350_000));
        assert_eq!(convert("7", SemanticType::MagnitudeInt), Cell::Int(7));
        assert_eq!(convert("7.9", SemanticType::MagnitudeInt), Cell::Int(7));
        // suffix is case-sensitive
        assert_eq!(convert("5k", SemanticType::MagnitudeInt), Cell::NaN);
        assert_eq!(convert("1.2BB", SemanticType::MagnitudeInt), Cell::NaN);
        assert_eq!(convert("0B", SemanticType::MagnitudeInt), Cell::NaN);
        assert_eq!(convert("", SemanticType::MagnitudeInt), Cell::NaN);
    }

    #[test]
    fn test_grouped_and_plain_int() {
        assert_eq!(convert("1,234,567", SemanticType::GroupedInt), Cell::Int(1_234_567));
        assert_eq!(convert("1,234.5", SemanticType::GroupedInt), Cell::NaN);
        assert_eq!(convert("42", SemanticType::Int), Cell::Int(42));
        assert_eq!(convert("0", SemanticType::Int), Cell::NaN);
        assert_eq!(convert("4.2", SemanticType::Int), Cell::NaN);
    }

    #[test]
    fn test_string() {
        assert_eq!(convert("-", SemanticType::String), Cell::NaN);
        assert_eq!(convert("AAPL", SemanticType::String), Cell::Text("AAPL".into()));
        assert_eq!(convert("0", SemanticType::String), Cell::Text("0".into()));
    }

    #[test]
    fn test_coerce_table_by_column() {
        let mut t = table(&[
            &["Ticker", "Market Cap", "Dividend", "Volume", "Notes"],
            &["AAPL", "2.5B", "0.5%", "1,234,567", "0"],
            &["XYZ", "-", "0%", "-", "-"],
        ]);
        coerce(&mut t);

        assert_eq!(
            t.rows()[0],
            [
                Cell::Text("AAPL".into()),
                Cell::Int(2_500_000_000),
                Cell::Float(0.005),
                Cell::Int(1_234_567),
                Cell::Text("0".into()),
            ]
        );
        assert_eq!(
            t.rows()[1],
            [Cell::Text("XYZ".into()), Cell::NaN, Cell::NaN, Cell::NaN, Cell::Text("-".into())]
        );
        assert_eq!(
            t.types(),
            [
                Some(SemanticType::String),
                Some(SemanticType::MagnitudeInt),
                Some(SemanticType::Percent),
                Some(SemanticType::GroupedInt),
                None,
            ]
        );
        assert_eq!(t.headers()[4], "Notes");
    }

    #[test]
    fn test_coerce_is_idempotent() {
        let mut t = table(&[
            &["P/E", "Perf Week", "Shs Float", "No.", "Sector"],
            &["15.2", "12.5%", "1.2B", "1", "Technology"],
            &["0.125", "-", "500K", "2", "-"],
        ]);
        coerce(&mut t);
        let once = t.clone();
        coerce(&mut t);
        assert_eq!(t, once);
    }

    #[test]
    fn test_custom_lookup() {
        let lookup = TypeLookup::builtin()
            .with_overrides(r#"{"Notes": "int"}"#)
            .unwrap();
        let mut t = table(&[&["Notes"], &["12"]]);
        coerce_with(&mut t, &lookup);
        assert_eq!(t.rows()[0], [Cell::Int(12)]);
    }
}
