//! Store connection settings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default time a connection waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors in the store configuration, reported at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A setting that has no default was not provided.
    MissingSetting(&'static str),
    /// The configured engine kind is not supported.
    UnsupportedEngine(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSetting(name) => {
                write!(f, "Missing store setting '{}'", name)
            }
            ConfigError::UnsupportedEngine(engine) => write!(
                f,
                "Unsupported store engine '{}'. Supported engines: sqlite, postgresql",
                engine
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Relational engines the store can connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Sqlite,
    Postgres,
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    /// Accepts URL scheme names, ignoring a `+driver` suffix such as the one
    /// in `postgresql+psycopg2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let scheme = name.split('+').next().unwrap_or_default();

        match scheme {
            "sqlite" | "sqlite3" => Ok(EngineKind::Sqlite),
            "postgres" | "postgresql" => Ok(EngineKind::Postgres),
            _ => Err(ConfigError::UnsupportedEngine(name)),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Sqlite => write!(f, "sqlite"),
            EngineKind::Postgres => write!(f, "postgresql"),
        }
    }
}

/// Set of table names permitted for dynamic table-name operations.
///
/// An unrestricted list permits any table whose name is a plain identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableAllowList {
    tables: Option<BTreeSet<String>>,
}

impl TableAllowList {
    pub fn unrestricted() -> Self {
        Self { tables: None }
    }

    pub fn only<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: Some(tables.into_iter().map(Into::into).collect()),
        }
    }

    /// Parses a comma-separated list. A blank list is unrestricted.
    pub fn parse(list: &str) -> Self {
        let tables: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tables.is_empty() {
            Self::unrestricted()
        } else {
            Self::only(tables)
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.tables.is_some()
    }

    pub fn permits(&self, table: &str) -> bool {
        match &self.tables {
            Some(tables) => tables.contains(table),
            None => true,
        }
    }
}

/// Connection parameters for the relational store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub engine: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Database name. For sqlite this is the database file path.
    pub database: Option<String>,
    pub busy_timeout: Duration,
    pub allow_list: TableAllowList,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            engine: None,
            username: None,
            password: None,
            host: None,
            port: None,
            database: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            allow_list: TableAllowList::unrestricted(),
        }
    }
}

impl StoreConfig {
    pub fn engine_kind(&self) -> Result<EngineKind, ConfigError> {
        self.engine
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("db_engine"))?
            .parse()
    }

    pub fn database_name(&self) -> Result<&str, ConfigError> {
        self.database
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("db_name"))
    }

    pub fn host_name(&self) -> Result<&str, ConfigError> {
        self.host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("rds_endpoint"))
    }

    pub fn user_name(&self) -> Result<&str, ConfigError> {
        self.username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("db_username"))
    }

    /// A connection URL for log output. The password is never included.
    pub fn redacted_url(&self) -> String {
        let engine = self.engine.as_deref().unwrap_or("?");
        let database = self.database.as_deref().unwrap_or("?");

        match (&self.username, &self.host) {
            (Some(user), Some(host)) => {
                let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
                format!("{}://{}:***@{}{}/{}", engine, user, host, port, database)
            }
            (None, Some(host)) => {
                let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
                format!("{}://{}{}/{}", engine, host, port, database)
            }
            _ => format!("{}:///{}", engine, database),
        }
    }
}
