//! The employee schema and its validator.

mod employee;
mod validation;
mod validation_errors;

pub use employee::{
    DEPARTMENTS, EMPLOYEE_FIELDS, EMPLOYEE_ID_COLUMN, EMPLOYEES_TABLE, FieldKind, FieldSpec,
    LOCATIONS, ROLES, employee_json_schema, field_spec,
};
pub use validation::{ValidatedRecord, validate_employee, validate_employee_update};
pub use validation_errors::{FieldError, ValidationError, ValidationReason};
