//! SQLite backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use rusqlite::config::DbConfig;
use rusqlite::{Connection, OpenFlags, TransactionBehavior, params_from_iter};

use super::sql::Dialect;
use super::{Connector, QueryResult, Session, StorageError};
use crate::config::{ConfigError, DEFAULT_BUSY_TIMEOUT, StoreConfig};
use crate::value::ColumnValue;

/// Connects to an existing SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Builds a connector from store settings. `db_name` is the file path.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.database_name()?).with_busy_timeout(config.busy_timeout))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a configured connection to the database file.
    pub fn connect(&self) -> Result<Connection, StorageError> {
        debug!("Opening store connection: {:?}", self.path);

        // The table schema is pre-existing, so a missing file is a connection failure
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let connection = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            StorageError::Connection(format!("{}: {}", self.path.display(), e))
        })?;
        connection.busy_timeout(self.busy_timeout)?;

        // A double-quoted name must always be an identifier, never a string literal
        connection.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
        connection.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;

        Ok(connection)
    }
}

impl Connector for SqliteConnector {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn open(&self) -> Result<Box<dyn Session>, StorageError> {
        Ok(Box::new(SqliteSession {
            connection: self.connect()?,
        }))
    }
}

struct SqliteSession {
    connection: Connection,
}

impl Session for SqliteSession {
    fn query(
        &mut self,
        statement: &str,
        params: &[&ColumnValue],
    ) -> Result<QueryResult, StorageError> {
        let mut prepared = self.connection.prepare(statement)?;
        Ok(QueryResult::collect(&mut prepared, params_from_iter(params))?)
    }

    fn execute(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<usize, StorageError> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::transaction)?;
        // Dropping `tx` on the error path rolls it back
        let affected = tx.execute(statement, params_from_iter(params))?;
        tx.commit().map_err(StorageError::transaction)?;
        Ok(affected)
    }

    fn insert(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<i64, StorageError> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::transaction)?;
        let id: i64 = tx.query_row(statement, params_from_iter(params), |row| row.get(0))?;
        tx.commit().map_err(StorageError::transaction)?;
        Ok(id)
    }
}
