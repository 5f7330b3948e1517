//! Error types for store access

use std::fmt;

use postgres::error::SqlState;
use rusqlite::ErrorCode;

use crate::schema::ValidationError;

/// A failure reported by the relational store.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The store could not be opened or reached.
    Connection(String),
    /// The statement was rejected or failed while executing.
    Query(String),
    /// A constraint (not null, unique, check, ...) was violated.
    Constraint(String),
    /// The database stayed locked past the busy timeout.
    Timeout(String),
    /// The transaction could not be started or committed.
    Transaction(String),
}

impl StorageError {
    /// Classifies an error raised while starting or committing a transaction.
    pub(crate) fn transaction(err: impl Into<StorageError>) -> Self {
        match err.into() {
            StorageError::Query(message) => StorageError::Transaction(message),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::ConstraintViolation => StorageError::Constraint(err.to_string()),
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                    StorageError::Timeout(err.to_string())
                }
                ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::PermissionDenied => {
                    StorageError::Connection(err.to_string())
                }
                _ => StorageError::Query(err.to_string()),
            },
            _ => StorageError::Query(err.to_string()),
        }
    }
}

impl From<postgres::Error> for StorageError {
    fn from(err: postgres::Error) -> Self {
        if err.is_closed() {
            return StorageError::Connection(err.to_string());
        }
        classify_sql_state(err.code(), err.to_string())
    }
}

/// Classifies a PostgreSQL failure by its SQLSTATE.
fn classify_sql_state(state: Option<&SqlState>, message: String) -> StorageError {
    let Some(state) = state else {
        return StorageError::Query(message);
    };

    if *state == SqlState::LOCK_NOT_AVAILABLE || *state == SqlState::QUERY_CANCELED {
        return StorageError::Timeout(message);
    }
    // The first two characters of a SQLSTATE name its class
    match state.code().get(..2) {
        Some("23") => StorageError::Constraint(message),
        Some("08") => StorageError::Connection(message),
        Some("40") => StorageError::Transaction(message),
        _ => StorageError::Query(message),
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Connection(msg) => write!(f, "Could not connect to the store: {}", msg),
            StorageError::Query(msg) => write!(f, "Query failed: {}", msg),
            StorageError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            StorageError::Timeout(msg) => write!(f, "Store timed out: {}", msg),
            StorageError::Transaction(msg) => write!(f, "Transaction failed: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Error returned by every data access operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Input was rejected before any SQL was issued.
    Validation(ValidationError),
    /// The store failed; any open transaction was rolled back.
    Storage(StorageError),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Storage(err)
    }
}


impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(err) => write!(f, "{}", err),
            StoreError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(err) => Some(err),
            StoreError::Storage(err) => Some(err),
        }
    }
}
