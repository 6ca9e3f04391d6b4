//! Row materialization
//!
//! Folds field maps into rectangular rows under a fixed header list. The
//! header row is always row zero.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extractors::FieldMap;

/// Cell written for a header the record does not carry
pub const MISSING: &str = "-";

/// Canonical not-a-number marker
pub const NAN: &str = "NaN";

/// Build rows from field maps; keys outside `headers` are dropped.
///
/// Absent and `null` values become [`MISSING`], a value already spelled
/// [`MISSING`] becomes [`NAN`], and lists of string maps are written as
/// compact JSON. Any other shape is an error.
pub fn materialize(headers: &[&str], records: Vec<FieldMap>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(headers.iter().map(|h| h.to_string()).collect::<Vec<_>>());

    for (index, mut record) in records.into_iter().enumerate() {
        let mut row = Vec::with_capacity(headers.len());
        for header in headers {
            let cell = match record.remove(*header) {
                None | Some(Value::Null) => MISSING.to_string(),
                Some(Value::String(s)) if s == MISSING => NAN.to_string(),
                Some(Value::String(s)) => s,
                Some(value) => serialize_nested(index, header, value)?,
            };
            row.push(cell);
        }
        rows.push(row);
    }

    debug!(rows = rows.len() - 1, columns = headers.len(), "materialized rows");
    Ok(rows)
}

/// Serialize a list of string-keyed string maps
fn serialize_nested(record: usize, field: &str, value: Value) -> Result<String> {
    let unsupported = |kind: &'static str| Error::UnsupportedValueType {
        record,
        field: field.to_string(),
        kind,
    };

    let Value::Array(items) = &value else {
        return Err(unsupported(value_kind(&value)));
    };

    for item in items {
        match item {
            Value::Object(map) if map.values().all(Value::is_string) => {}
            Value::Object(_) => return Err(unsupported("object with non-string values")),
            other => return Err(unsupported(value_kind(other))),
        }
    }

    Ok(serde_json::to_string(&value)?)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HEADERS: &[&str] = &["Date", "Title", "Source URL"];

    fn record(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_rows_are_rectangular_with_header_first() {
        let records = vec![
            record(json!({"Date": "Jan-02", "Title": "A", "Source URL": "https://a"})),
            record(json!({"Title": "B"})),
            record(json!({})),
        ];
        let rows = materialize(HEADERS, records).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], HEADERS);
        assert!(rows.iter().all(|r| r.len() == HEADERS.len()));
    }

    #[test]
    fn test_missing_source_url_is_dash() {
        let rows = materialize(HEADERS, vec![record(json!({"Date": "d", "Title": "t"}))]).unwrap();
        assert_eq!(rows[1], ["d", "t", "-"]);
    }

    #[test]
    fn test_null_is_missing_and_dash_is_nan() {
        let rows = materialize(HEADERS, vec![record(json!({"Date": null, "Title": "-"}))]).unwrap();
        assert_eq!(rows[1], ["-", "NaN", "-"]);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let rows = materialize(&["Title"], vec![record(json!({"Title": "x", "Extra": 5}))]).unwrap();
        assert_eq!(rows[1], ["x"]);
    }

    #[test]
    fn test_nested_maps_serialize_compactly() {
        let records = vec![record(json!({
            "Title": [{"name": "a", "id": "1"}, {"name": "b", "id": "2"}]
        }))];
        let rows = materialize(&["Title"], records).unwrap();
        assert_eq!(rows[1][0], r#"[{"id":"1","name":"a"},{"id":"2","name":"b"}]"#);
    }

    #[test]
    fn test_unsupported_shapes() {
        for (value, kind) in [
            (json!(42), "number"),
            (json!(true), "bool"),
            (json!({"a": "b"}), "object"),
            (json!(["a"]), "string"),
            (json!([{"a": 1}]), "object with non-string values"),
        ] {
            let err = materialize(&["Date", "Title"], vec![json!({}), json!({"Title": value})]
                .into_iter()
                .map(record)
                .collect())
            .unwrap_err();

            match err {
                Error::UnsupportedValueType { record, field, kind: k } => {
                    assert_eq!(record, 1);
                    assert_eq!(field, "Title");
                    assert_eq!(k, kind);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_records() {
        let rows = materialize(HEADERS, Vec::new()).unwrap();
        assert_eq!(rows, vec![HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()]);
    }
}
