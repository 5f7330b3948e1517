//! Connection factories for the store.

use super::sql::Dialect;
use super::{QueryResult, StorageError};
use crate::value::ColumnValue;

/// Opens one store connection per call.
///
/// The connection is closed when the caller drops the session, on every
/// exit path.
pub trait Connector: Send + Sync {
    /// Placeholder syntax of statements sent through this connector.
    fn dialect(&self) -> Dialect;

    fn open(&self) -> Result<Box<dyn Session>, StorageError>;
}

/// An open connection to the store.
///
/// Writes run in their own transaction, which is committed before the
/// method returns or rolled back on failure.
pub trait Session {
    /// Runs a statement and collects every row it returns.
    fn query(
        &mut self,
        statement: &str,
        params: &[&ColumnValue],
    ) -> Result<QueryResult, StorageError>;

    /// Runs a write in a transaction, returning the number of rows changed.
    fn execute(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<usize, StorageError>;

    /// Runs an insert in a transaction, returning the integer key of the
    /// inserted row.
    fn insert(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<i64, StorageError>;
}
