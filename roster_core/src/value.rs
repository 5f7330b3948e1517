//! Values bound to statement parameters and read back from rows.

use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use serde_json::{Map, Number, Value};

use crate::schema::ValidationError;

/// Date format used for date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A normalized value for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

impl ColumnValue {
    /// Converts a caller-supplied JSON value for `column` into a bindable value.
    ///
    /// Booleans bind as 0/1. Arrays and objects have no column representation
    /// and are rejected.
    pub fn from_json(column: &str, value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null => Ok(ColumnValue::Null),
            Value::Bool(b) => Ok(ColumnValue::Integer(i64::from(*b))),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(ColumnValue::Integer(i)),
                None => n
                    .as_f64()
                    .map(ColumnValue::Real)
                    .ok_or_else(|| ValidationError::UnsupportedValue {
                        column: column.to_string(),
                        actual: "number",
                    }),
            },
            Value::String(s) => Ok(ColumnValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(ValidationError::UnsupportedValue {
                column: column.to_string(),
                actual: json_type_name(value),
            }),
        }
    }

    /// Converts every entry of a JSON object, keeping key order.
    pub fn map_from_json(
        fields: &Map<String, Value>,
    ) -> Result<Vec<(String, ColumnValue)>, ValidationError> {
        fields
            .iter()
            .map(|(column, value)| Ok((column.clone(), Self::from_json(column, value)?)))
            .collect()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Name of the value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Null => "null",
            ColumnValue::Integer(_) => "integer",
            ColumnValue::Real(_) => "number",
            ColumnValue::Text(_) => "string",
            ColumnValue::Date(_) => "date",
        }
    }
}

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ColumnValue::Null => ToSqlOutput::Owned(SqlValue::Null),
            ColumnValue::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            ColumnValue::Real(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            ColumnValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            ColumnValue::Date(d) => {
                ToSqlOutput::Owned(SqlValue::Text(d.format(DATE_FORMAT).to_string()))
            }
        })
    }
}

/// Name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts a column value read from a row into JSON.
pub(crate) fn value_ref_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        // Non-finite reals have no JSON representation
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}
