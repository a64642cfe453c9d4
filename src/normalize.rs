//! Scalar normalization: one raw record field -> the canonical value the
//! target column accepts. All record access is capability-checked; a missing
//! key or wrong shape is a typed extraction failure, never a panic.

use crate::date::parse_loose_date;
use crate::error::TranscodeError;
use crate::schema::{Column, ColumnType};
use serde_json::Value;
use time::Date;

/// A fully-normalized scalar, either a true absence-of-value or a native
/// value of the column's declared type.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedValue {
    Null,
    Integer(i64),
    Text(String),
    Date(Date),
    Decimal(f64),
}

impl NormalizedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Pull `column`'s raw value out of `record`, unwrapping one nested
/// sub-field when the column declares it.
fn extract_raw<'a>(record: &'a Value, column: &Column) -> Result<&'a Value, TranscodeError> {
    let raw = record
        .get(&column.name)
        .ok_or_else(|| TranscodeError::missing_field(&column.name))?;

    let Some(key) = column.nested.as_deref() else {
        return Ok(raw);
    };

    // A null measurement object normalizes like a null scalar.
    if raw.is_null() {
        return Ok(raw);
    }
    raw.as_object()
        .and_then(|obj| obj.get(key))
        .ok_or_else(|| {
            TranscodeError::bad_field(&column.name, format!("expected object with {key:?} sub-field"))
        })
}

/// Normalize one field of `record` for `column`. Null input always becomes
/// [`NormalizedValue::Null`] regardless of the target type; never an empty
/// string, which would mean "empty text" rather than "no value".
pub fn normalize(record: &Value, column: &Column) -> Result<NormalizedValue, TranscodeError> {
    let raw = extract_raw(record, column)?;
    if raw.is_null() {
        return Ok(NormalizedValue::Null);
    }

    match column.ty {
        ColumnType::Integer => match raw.as_i64() {
            Some(n) => Ok(NormalizedValue::Integer(n)),
            None => Err(TranscodeError::bad_field(
                &column.name,
                format!("expected integer, got {raw}"),
            )),
        },
        ColumnType::Decimal => match raw.as_f64() {
            Some(x) => Ok(NormalizedValue::Decimal(x)),
            None => Err(TranscodeError::bad_field(
                &column.name,
                format!("expected number, got {raw}"),
            )),
        },
        ColumnType::Date => match raw.as_str() {
            Some(s) => parse_loose_date(s).map(NormalizedValue::Date),
            None => Err(TranscodeError::bad_field(
                &column.name,
                format!("expected date text, got {raw}"),
            )),
        },
        ColumnType::Text => Ok(NormalizedValue::Text(display_text(raw))),
    }
}

/// Display form of a non-null value bound for a text column. Strings pass
/// through; numbers and bools stringify the way the source system did.
fn display_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
