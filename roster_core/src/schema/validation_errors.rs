//! Error types for input validation

use std::fmt;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReason {
    /// A required field is absent or null.
    Missing,
    /// The JSON value has the wrong type.
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
    /// An enumerated field holds a value outside its allowed set.
    NotInEnum {
        value: String,
        allowed: &'static [&'static str],
    },
    /// A date field does not hold a valid `YYYY-MM-DD` calendar date.
    InvalidDate { value: String },
    /// The field is not part of the schema.
    UnknownField,
    /// The field is assigned by the store and cannot be written.
    ReadOnly,
}

/// A rejected field together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub reason: ValidationReason,
}

impl FieldError {
    pub fn new(field: &str, reason: ValidationReason) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, ValidationReason::Missing)
    }

    pub fn unknown(field: &str) -> Self {
        Self::new(field, ValidationReason::UnknownField)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationReason::Missing => write!(f, "'{}' is required", self.field),
            ValidationReason::WrongType { expected, actual } => write!(
                f,
                "'{}' must be a {}, got {}",
                self.field, expected, actual
            ),
            ValidationReason::NotInEnum { value, allowed } => write!(
                f,
                "'{}' is not a valid {}. Allowed: {}",
                value,
                self.field,
                allowed.join(", ")
            ),
            ValidationReason::InvalidDate { value } => write!(
                f,
                "'{}' is not a valid date for '{}'. Expected YYYY-MM-DD",
                value, self.field
            ),
            ValidationReason::UnknownField => {
                write!(f, "'{}' is not an employee field", self.field)
            }
            ValidationReason::ReadOnly => {
                write!(f, "'{}' is assigned by the store and cannot be set", self.field)
            }
        }
    }
}

/// Input rejected before any SQL was built.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more fields of a record payload were rejected.
    InvalidFields(Vec<FieldError>),
    /// An update was requested with nothing to set.
    EmptyUpdate,
    /// Raw query text was blank.
    EmptyQuery,
    /// A table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// The table is not on the configured allow-list.
    TableNotAllowed(String),
    /// A value that cannot be bound to a column parameter.
    UnsupportedValue {
        column: String,
        actual: &'static str,
    },
}

impl ValidationError {
    /// The rejected fields, if this error came from record validation.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ValidationError::InvalidFields(errors) => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidFields(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Validation failed:\n- {}", messages.join("\n- "))
            }
            ValidationError::EmptyUpdate => write!(f, "No update data provided"),
            ValidationError::EmptyQuery => write!(f, "Query text is empty"),
            ValidationError::InvalidIdentifier(name) => write!(
                f,
                "'{}' is not a valid table or column name. Use letters, digits and underscores only",
                name
            ),
            ValidationError::TableNotAllowed(table) => {
                write!(f, "Table '{}' is not on the allow-list", table)
            }
            ValidationError::UnsupportedValue { column, actual } => write!(
                f,
                "Value for '{}' must be a string, number, boolean or null, got {}",
                column, actual
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
