use chrono::NaiveDate;
use log::debug;
use serde_json::{Map, Value};

use super::employee::{EMPLOYEE_FIELDS, EMPLOYEE_ID_COLUMN, FieldKind, FieldSpec, field_spec};
use super::{FieldError, ValidationError, ValidationReason};
use crate::value::{ColumnValue, DATE_FORMAT, json_type_name};

/// An employee payload that passed validation.
///
/// Holds exactly the schema's columns, in schema order, ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    columns: Vec<(&'static str, ColumnValue)>,
}

impl ValidatedRecord {
    pub fn columns(&self) -> &[(&'static str, ColumnValue)] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value)
    }
}

/// Validates an employee creation payload.
///
/// Every field is checked and all problems are reported together. Fields
/// outside the schema are rejected so they can never become column names.
pub fn validate_employee(payload: &Map<String, Value>) -> Result<ValidatedRecord, ValidationError> {
    debug!("Validating employee payload with {} fields", payload.len());

    let mut errors = Vec::new();
    let mut columns = Vec::with_capacity(EMPLOYEE_FIELDS.len());

    for spec in EMPLOYEE_FIELDS {
        match payload.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    errors.push(FieldError::missing(spec.name));
                } else {
                    columns.push((spec.name, ColumnValue::Null));
                }
            }
            Some(value) => match normalize(spec, value) {
                Ok(normalized) => columns.push((spec.name, normalized)),
                Err(reason) => errors.push(FieldError::new(spec.name, reason)),
            },
        }
    }

    errors.extend(
        payload
            .keys()
            .filter(|key| field_spec(key).is_none())
            .map(|key| FieldError::unknown(key)),
    );

    if errors.is_empty() {
        Ok(ValidatedRecord { columns })
    } else {
        debug!("Employee payload failed validation with {} errors", errors.len());
        Err(ValidationError::InvalidFields(errors))
    }
}

/// Validates the fields of an employee update.
///
/// Each field gets the same checks as on creation. Fields outside the schema
/// are rejected, required fields cannot be cleared and the id cannot be set.
/// All problems are reported together.
pub fn validate_employee_update(
    fields: &[(String, ColumnValue)],
) -> Result<Vec<(String, ColumnValue)>, ValidationError> {
    debug!("Validating employee update with {} fields", fields.len());

    let mut errors = Vec::new();
    let mut columns = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        if name == EMPLOYEE_ID_COLUMN {
            errors.push(FieldError::new(name, ValidationReason::ReadOnly));
            continue;
        }
        let Some(spec) = field_spec(name) else {
            errors.push(FieldError::unknown(name));
            continue;
        };

        let normalized = match value {
            ColumnValue::Null if spec.required => Err(ValidationReason::Missing),
            ColumnValue::Null => Ok(ColumnValue::Null),
            ColumnValue::Text(text) => normalize_text(spec, text),
            ColumnValue::Date(date) if matches!(spec.kind, FieldKind::Date) => {
                Ok(ColumnValue::Date(*date))
            }
            other => Err(ValidationReason::WrongType {
                expected: "string",
                actual: other.type_name(),
            }),
        };

        match normalized {
            Ok(value) => columns.push((name.clone(), value)),
            Err(reason) => errors.push(FieldError::new(name, reason)),
        }
    }

    if errors.is_empty() {
        Ok(columns)
    } else {
        debug!("Employee update failed validation with {} errors", errors.len());
        Err(ValidationError::InvalidFields(errors))
    }
}

fn normalize(spec: &FieldSpec, value: &Value) -> Result<ColumnValue, ValidationReason> {
    match value {
        Value::String(text) => normalize_text(spec, text),
        other => Err(ValidationReason::WrongType {
            expected: "string",
            actual: json_type_name(other),
        }),
    }
}

fn normalize_text(spec: &FieldSpec, text: &str) -> Result<ColumnValue, ValidationReason> {
    match spec.kind {
        FieldKind::Text => Ok(ColumnValue::Text(text.to_string())),
        FieldKind::Enum(allowed) => {
            if allowed.contains(&text) {
                Ok(ColumnValue::Text(text.to_string()))
            } else {
                Err(ValidationReason::NotInEnum {
                    value: text.to_string(),
                    allowed,
                })
            }
        }
        FieldKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(ColumnValue::Date)
            .map_err(|_| ValidationReason::InvalidDate {
                value: text.to_string(),
            }),
    }
}
