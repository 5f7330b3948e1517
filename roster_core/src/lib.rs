//! Core record model and data access for Roster.
//!
//! This crate validates employee payloads against the fixed employee schema
//! and runs parameterized statements against the relational store, one
//! connection per call.

pub mod config;
pub mod schema;
pub mod store;
pub mod value;

pub use config::{ConfigError, EngineKind, StoreConfig, TableAllowList};
pub use schema::{
    EMPLOYEE_FIELDS, EMPLOYEE_ID_COLUMN, EMPLOYEES_TABLE, FieldError, FieldKind, FieldSpec,
    ValidatedRecord, ValidationError, ValidationReason, validate_employee,
    validate_employee_update,
};
pub use store::{
    Connector, Dialect, PostgresConnector, QueryResult, RecordStore, Row, Session,
    SqliteConnector, StorageError, StoreError,
};
pub use value::ColumnValue;
