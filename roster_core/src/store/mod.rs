//! Data access for the employee store.
//!
//! Every operation opens its own connection through the injected
//! [`Connector`], binds all caller values as parameters, and wraps writes in
//! a transaction that commits or rolls back before the call returns.

mod connector;
mod postgresql;
mod rows;
pub mod sql;
mod sqlite;
mod store_errors;

use std::sync::Arc;

use log::{debug, warn};

use crate::config::{ConfigError, EngineKind, StoreConfig, TableAllowList};
use crate::schema::{
    EMPLOYEE_ID_COLUMN, EMPLOYEES_TABLE, ValidatedRecord, ValidationError, validate_employee_update,
};
use crate::value::ColumnValue;

pub use connector::{Connector, Session};
pub use postgresql::PostgresConnector;
pub use rows::{QueryResult, Row};
pub use sql::Dialect;
pub use sqlite::SqliteConnector;
pub use store_errors::{StorageError, StoreError};

/// CRUD access to the relational store.
///
/// Holds no state besides its connector and allow-list, so clones are cheap
/// and calls on different clones never interact.
#[derive(Clone)]
pub struct RecordStore {
    connector: Arc<dyn Connector>,
    allow_list: Arc<TableAllowList>,
}

impl RecordStore {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            allow_list: Arc::new(TableAllowList::unrestricted()),
        }
    }

    /// Restricts dynamic table names to `allow_list`.
    pub fn with_allow_list(mut self, allow_list: TableAllowList) -> Self {
        self.allow_list = Arc::new(allow_list);
        self
    }

    /// Creates a store from settings, failing fast on incomplete configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let store = match config.engine_kind()? {
            EngineKind::Sqlite => Self::new(SqliteConnector::from_config(config)?),
            EngineKind::Postgres => Self::new(PostgresConnector::from_config(config)?),
        };
        Ok(store.with_allow_list(config.allow_list.clone()))
    }

    pub fn allow_list(&self) -> &TableAllowList {
        &self.allow_list
    }

    /// Inserts a validated employee and returns the store-generated id.
    pub fn create(&self, record: &ValidatedRecord) -> Result<i64, StoreError> {
        debug!("Creating record in '{}'", EMPLOYEES_TABLE);

        let result = (|| -> Result<i64, StoreError> {
            let columns: Vec<&str> = record.columns().iter().map(|(name, _)| *name).collect();
            let statement = sql::insert_returning(
                self.connector.dialect(),
                EMPLOYEES_TABLE,
                &columns,
                EMPLOYEE_ID_COLUMN,
            )?;
            let values: Vec<&ColumnValue> = record.columns().iter().map(|(_, v)| v).collect();

            let mut session = self.connector.open()?;
            Ok(session.insert(&statement, &values)?)
        })();

        logged("create", result)
    }

    /// Selects all rows of `table`, optionally filtered by `column = value`.
    ///
    /// The filter is applied only when both a column and a non-null value are
    /// given. The value is bound; the column name is checked and quoted.
    pub fn read(
        &self,
        table: &str,
        filter_column: Option<&str>,
        filter_value: Option<&ColumnValue>,
    ) -> Result<QueryResult, StoreError> {
        debug!(
            "Reading from '{}', filter={:?}={:?}",
            table, filter_column, filter_value
        );

        let result = (|| -> Result<QueryResult, StoreError> {
            self.check_table(table)?;

            let filter = match (filter_column, filter_value) {
                (Some(column), Some(value)) if !column.is_empty() && !value.is_null() => {
                    Some((column, value))
                }
                _ => None,
            };
            let statement = sql::select(
                self.connector.dialect(),
                table,
                filter.map(|(column, _)| column),
            )?;

            let mut session = self.connector.open()?;
            let rows = match filter {
                Some((_, value)) => session.query(&statement, &[value])?,
                None => session.query(&statement, &[])?,
            };

            Ok(rows)
        })();

        logged("read", result)
    }

    /// Sets `fields` on the row with identifier `id`.
    ///
    /// Returns the number of rows changed; an unknown id changes 0 rows. An
    /// empty field list fails before any connection is opened. Updates to the
    /// employees table are validated against the employee schema first.
    pub fn update(
        &self,
        table: &str,
        id: i64,
        fields: &[(String, ColumnValue)],
    ) -> Result<usize, StoreError> {
        debug!("Updating record {} in '{}' ({} fields)", id, table, fields.len());

        let result = (|| -> Result<usize, StoreError> {
            if fields.is_empty() {
                return Err(ValidationError::EmptyUpdate.into());
            }
            self.check_table(table)?;

            let validated;
            let fields = if table == EMPLOYEES_TABLE {
                validated = validate_employee_update(fields)?;
                validated.as_slice()
            } else {
                fields
            };

            let columns: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
            let statement =
                sql::update(self.connector.dialect(), table, &columns, EMPLOYEE_ID_COLUMN)?;
            let key = ColumnValue::Integer(id);
            let values: Vec<&ColumnValue> =
                fields.iter().map(|(_, value)| value).chain([&key]).collect();

            let mut session = self.connector.open()?;
            Ok(session.execute(&statement, &values)?)
        })();

        logged("update", result)
    }

    /// Deletes the row with identifier `id`, returning the rows removed.
    pub fn delete(&self, table: &str, id: i64) -> Result<usize, StoreError> {
        debug!("Deleting record {} from '{}'", id, table);

        let result = (|| -> Result<usize, StoreError> {
            self.check_table(table)?;
            let statement = sql::delete(self.connector.dialect(), table, EMPLOYEE_ID_COLUMN)?;
            let key = ColumnValue::Integer(id);

            let mut session = self.connector.open()?;
            Ok(session.execute(&statement, &[&key])?)
        })();

        logged("delete", result)
    }

    /// Executes caller-supplied query text verbatim and returns its rows.
    ///
    /// Nothing can be bound here since the text itself is the input: the
    /// caller is trusted completely and the allow-list does not apply.
    pub fn raw_query(&self, query: &str) -> Result<QueryResult, StoreError> {
        debug!("Running raw query ({} bytes)", query.len());

        let result = (|| -> Result<QueryResult, StoreError> {
            if query.trim().is_empty() {
                return Err(ValidationError::EmptyQuery.into());
            }

            let mut session = self.connector.open()?;
            Ok(session.query(query, &[])?)
        })();

        logged("raw_query", result)
    }

    fn check_table(&self, table: &str) -> Result<(), ValidationError> {
        sql::quote_identifier(table)?;
        if self.allow_list.permits(table) {
            Ok(())
        } else {
            Err(ValidationError::TableNotAllowed(table.to_string()))
        }
    }
}

fn logged<T>(operation: &str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    match &result {
        Err(StoreError::Storage(err)) => warn!("Store operation '{}' failed: {}", operation, err),
        Err(StoreError::Validation(err)) => {
            debug!("Store operation '{}' rejected: {}", operation, err)
        }
        Ok(_) => {}
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Connector that counts open attempts and always fails.
    #[derive(Default)]
    struct UnreachableConnector {
        opens: AtomicUsize,
    }

    impl Connector for Arc<UnreachableConnector> {
        fn dialect(&self) -> Dialect {
            Dialect::Sqlite
        }

        fn open(&self) -> Result<Box<dyn Session>, StorageError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Connection("store is down".to_string()))
        }
    }

    #[test]
    fn test_unreachable_store_is_storage_error() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone());

        assert_matches!(
            store.read("employees", None, None),
            Err(StoreError::Storage(StorageError::Connection(_)))
        );
        assert_matches!(
            store.delete("employees", 1),
            Err(StoreError::Storage(StorageError::Connection(_)))
        );
        assert_eq!(connector.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_update_never_connects() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone());

        let result = store.update("employees", 1, &[]);

        assert_eq!(result, Err(StoreError::Validation(ValidationError::EmptyUpdate)));
        assert_eq!(connector.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bad_identifiers_never_connect() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone());

        assert_matches!(
            store.read("employees; DROP TABLE employees", None, None),
            Err(StoreError::Validation(ValidationError::InvalidIdentifier(_)))
        );
        assert_matches!(
            store.read("employees", Some("1=1 OR eid"), Some(&ColumnValue::Integer(1))),
            Err(StoreError::Validation(ValidationError::InvalidIdentifier(_)))
        );
        assert_matches!(
            store.update(
                "employees",
                1,
                &[("role = 'Manager', dob".to_string(), ColumnValue::Null)]
            ),
            Err(StoreError::Validation(ValidationError::InvalidIdentifier(_)))
        );
        assert_eq!(connector.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_allow_list_rejects_other_tables() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone())
            .with_allow_list(TableAllowList::only(["employees"]));

        assert_matches!(
            store.delete("salaries", 1),
            Err(StoreError::Validation(ValidationError::TableNotAllowed(t))) if t == "salaries"
        );
        assert_eq!(connector.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_raw_query_is_rejected() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone());

        assert_eq!(
            store.raw_query("   "),
            Err(StoreError::Validation(ValidationError::EmptyQuery))
        );
        assert_eq!(connector.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_employee_update_never_connects() {
        let connector = Arc::new(UnreachableConnector::default());
        let store = RecordStore::new(connector.clone());

        let fields = vec![
            ("location".to_string(), ColumnValue::Text("Mumbai".to_string())),
            ("eid".to_string(), ColumnValue::Integer(500)),
        ];

        assert_matches!(
            store.update("employees", 1, &fields),
            Err(StoreError::Validation(ValidationError::InvalidFields(errors))) if errors.len() == 2
        );
        assert_eq!(connector.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_selects_engine() {
        let sqlite = StoreConfig {
            engine: Some("sqlite".to_string()),
            database: Some("/tmp/hr.db".to_string()),
            ..StoreConfig::default()
        };
        let postgres = StoreConfig {
            engine: Some("postgresql".to_string()),
            username: Some("admin".to_string()),
            host: Some("db.internal".to_string()),
            database: Some("hr".to_string()),
            ..StoreConfig::default()
        };

        assert_eq!(
            RecordStore::from_config(&sqlite).unwrap().connector.dialect(),
            Dialect::Sqlite
        );
        assert_eq!(
            RecordStore::from_config(&postgres).unwrap().connector.dialect(),
            Dialect::Postgres
        );
    }
}
