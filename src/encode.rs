//! Row encoding: one record -> one delimited text line (escaped) or one
//! typed row tuple, always in schema column order.

use crate::error::TranscodeError;
use crate::normalize::{normalize, NormalizedValue};
use crate::schema::TableSchema;
use serde_json::Value;
use std::fmt::Write as _;

/// One fully-normalized record in schema column order. Its length always
/// equals the schema's column count.
pub type EncodedRow = Vec<NormalizedValue>;

/// Text-mode framing: delimiter byte and null-marker token, matching what
/// the bulk-copy channel is told to expect. Defaults are the classic COPY
/// arguments `DELIMITER '|', NULL '\N'` — a pipe rather than a comma, so
/// decimal and free-text commas never need quoting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFormat {
    pub delimiter: u8,
    pub null_marker: String,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self { delimiter: b'|', null_marker: r"\N".to_string() }
    }
}

/// Encode `record` as a typed row tuple.
pub fn encode_typed(record: &Value, schema: &TableSchema) -> Result<EncodedRow, TranscodeError> {
    schema.columns().iter().map(|col| normalize(record, col)).collect()
}

/// Encode `record` as one newline-terminated text line into `out`
/// (cleared first, so one buffer can be reused across the whole stream).
///
/// Backslash, the delimiter byte, and embedded newlines in text values are
/// escaped with a leading backslash (`\n` stays the two literal characters),
/// so a row is always exactly one line and splits unambiguously.
pub fn encode_text_line(
    record: &Value,
    schema: &TableSchema,
    fmt: &TextFormat,
    out: &mut String,
) -> Result<(), TranscodeError> {
    out.clear();
    for (i, col) in schema.columns().iter().enumerate() {
        if i > 0 {
            out.push(fmt.delimiter as char);
        }
        match normalize(record, col)? {
            NormalizedValue::Null => out.push_str(&fmt.null_marker),
            NormalizedValue::Integer(n) => {
                let _ = write!(out, "{n}");
            }
            NormalizedValue::Decimal(x) => {
                let _ = write!(out, "{x}");
            }
            NormalizedValue::Date(d) => {
                let _ = write!(out, "{:04}-{:02}-{:02}", d.year(), d.month() as u8, d.day());
            }
            NormalizedValue::Text(s) => push_escaped(out, &s, fmt.delimiter),
        }
    }
    out.push('\n');
    Ok(())
}

fn push_escaped(out: &mut String, s: &str, delimiter: u8) {
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c == delimiter as char => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType, TableSchema};
    use serde_json::json;

    fn small_schema() -> TableSchema {
        TableSchema::new(
            "t",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("name", ColumnType::Text),
                Column::new("first_brewed", ColumnType::Date),
                Column::new("abv", ColumnType::Decimal),
            ],
        )
    }

    #[test]
    fn text_line_joins_in_schema_order() {
        let rec = json!({
            "abv": 5.6,
            "name": "Punk IPA",
            "first_brewed": "04/2007",
            "id": 192,
        });
        let mut line = String::new();
        encode_text_line(&rec, &small_schema(), &TextFormat::default(), &mut line).unwrap();
        assert_eq!(line, "192|Punk IPA|2007-04-01|5.6\n");
    }

    #[test]
    fn null_renders_the_marker_not_an_empty_token() {
        let rec = json!({ "id": 1, "name": null, "first_brewed": "2007", "abv": null });
        let mut line = String::new();
        encode_text_line(&rec, &small_schema(), &TextFormat::default(), &mut line).unwrap();
        assert_eq!(line, "1|\\N|2007-01-01|\\N\n");
    }

    #[test]
    fn embedded_newline_stays_on_one_line() {
        let rec = json!({ "id": 1, "name": "top\nbottom", "first_brewed": "2007", "abv": 1 });
        let mut line = String::new();
        encode_text_line(&rec, &small_schema(), &TextFormat::default(), &mut line).unwrap();
        assert_eq!(line, "1|top\\nbottom|2007-01-01|1\n");
        assert_eq!(line.matches('\n').count(), 1, "row must be exactly one line");
    }

    #[test]
    fn delimiter_and_backslash_are_escaped() {
        let rec = json!({ "id": 1, "name": "a|b\\c", "first_brewed": "2007", "abv": 1 });
        let mut line = String::new();
        encode_text_line(&rec, &small_schema(), &TextFormat::default(), &mut line).unwrap();
        assert_eq!(line, "1|a\\|b\\\\c|2007-01-01|1\n");
    }

    #[test]
    fn typed_row_length_matches_schema() {
        let schema = small_schema();
        let rec = json!({ "id": 1, "name": "x", "first_brewed": "2007", "abv": null });
        let row = encode_typed(&rec, &schema).unwrap();
        assert_eq!(row.len(), schema.len());
        assert!(row[3].is_null());
    }

    #[test]
    fn missing_field_aborts_the_record() {
        let rec = json!({ "id": 1, "first_brewed": "2007", "abv": 1 });
        let err = encode_typed(&rec, &small_schema()).unwrap_err();
        match err {
            TranscodeError::RecordShape { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected RecordShape, got {other:?}"),
        }
    }

    #[test]
    fn custom_delimiter() {
        let fmt = TextFormat { delimiter: b'\t', null_marker: "NULL".to_string() };
        let rec = json!({ "id": 7, "name": null, "first_brewed": "2007", "abv": 0.5 });
        let mut line = String::new();
        encode_text_line(&rec, &small_schema(), &fmt, &mut line).unwrap();
        assert_eq!(line, "7\tNULL\t2007-01-01\t0.5\n");
    }
}
