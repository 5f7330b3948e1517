//! PostgreSQL backend.
//!
//! Statement parameters are typed by the server, so each [`ColumnValue`] is
//! converted to the Rust type the prepared statement expects before binding.
//! Result cells are decoded by column type into JSON.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use postgres::types::{ToSql, Type};
use postgres::{Client, Column, NoTls, Statement};
use serde_json::{Number, Value};

use super::rows::unique_column_names;
use super::sql::Dialect;
use super::{Connector, QueryResult, Row, Session, StorageError};
use crate::config::{ConfigError, StoreConfig};
use crate::value::{ColumnValue, DATE_FORMAT};

type Param = Box<dyn ToSql + Sync>;

/// Connects to a PostgreSQL server.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    config: postgres::Config,
}

impl PostgresConnector {
    /// Builds a connector from store settings.
    ///
    /// Host, user and database are required; password and port are optional.
    /// The busy timeout bounds both connecting and waiting on row locks.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let mut pg = postgres::Config::new();
        pg.host(config.host_name()?)
            .user(config.user_name()?)
            .dbname(config.database_name()?)
            .connect_timeout(config.busy_timeout)
            .options(&format!(
                "-c lock_timeout={}",
                config.busy_timeout.as_millis()
            ));

        if let Some(password) = &config.password {
            pg.password(password);
        }
        if let Some(port) = config.port {
            pg.port(port);
        }

        Ok(Self { config: pg })
    }

    pub fn config(&self) -> &postgres::Config {
        &self.config
    }
}

impl Connector for PostgresConnector {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn open(&self) -> Result<Box<dyn Session>, StorageError> {
        debug!("Opening store connection: {:?}", self.config.get_hosts());

        let client = self
            .config
            .connect(NoTls)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Box::new(PostgresSession { client }))
    }
}

struct PostgresSession {
    client: Client,
}

impl Session for PostgresSession {
    fn query(
        &mut self,
        statement: &str,
        params: &[&ColumnValue],
    ) -> Result<QueryResult, StorageError> {
        let prepared = self.client.prepare(statement)?;
        let bound = bind_all(&prepared, params)?;
        let rows = self.client.query(&prepared, &param_refs(&bound))?;
        collect(prepared.columns(), &rows)
    }

    fn execute(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<usize, StorageError> {
        let mut tx = self.client.transaction().map_err(StorageError::transaction)?;
        // Dropping `tx` on the error path rolls it back
        let prepared = tx.prepare(statement)?;
        let bound = bind_all(&prepared, params)?;
        let affected = tx.execute(&prepared, &param_refs(&bound))?;
        tx.commit().map_err(StorageError::transaction)?;

        Ok(usize::try_from(affected).unwrap_or(usize::MAX))
    }

    fn insert(&mut self, statement: &str, params: &[&ColumnValue]) -> Result<i64, StorageError> {
        let mut tx = self.client.transaction().map_err(StorageError::transaction)?;
        let prepared = tx.prepare(statement)?;
        let bound = bind_all(&prepared, params)?;
        let row = tx.query_one(&prepared, &param_refs(&bound))?;

        let key = match prepared.columns().first() {
            Some(column) => cell_to_json(&row, 0, column.type_())?,
            None => Value::Null,
        };
        let id = key.as_i64().ok_or_else(|| {
            StorageError::Query(format!("Insert returned a non-integer key: {}", key))
        })?;
        tx.commit().map_err(StorageError::transaction)?;

        Ok(id)
    }
}

fn bind_all(statement: &Statement, params: &[&ColumnValue]) -> Result<Vec<Param>, StorageError> {
    if statement.params().len() != params.len() {
        return Err(StorageError::Query(format!(
            "Statement expects {} parameters, got {}",
            statement.params().len(),
            params.len()
        )));
    }

    statement
        .params()
        .iter()
        .zip(params)
        .map(|(ty, value)| bind(value, ty))
        .collect()
}

fn param_refs(bound: &[Param]) -> Vec<&(dyn ToSql + Sync)> {
    bound.iter().map(|param| param.as_ref()).collect()
}

/// Converts `value` to the Rust type accepted by a parameter of type `ty`.
///
/// Text converts to numbers and dates when it parses, so a filter value
/// given as text still matches a typed column.
fn bind(value: &ColumnValue, ty: &Type) -> Result<Param, StorageError> {
    if value.is_null() {
        return Ok(typed_null(ty));
    }

    let mismatch = || {
        StorageError::Query(format!(
            "Cannot bind a {} value to a parameter of type {}",
            value.type_name(),
            ty
        ))
    };

    let param: Param = match *ty {
        Type::BOOL => Box::new(as_bool(value).ok_or_else(mismatch)?),
        Type::INT2 => Box::new(
            as_integer(value)
                .and_then(|i| i16::try_from(i).ok())
                .ok_or_else(mismatch)?,
        ),
        Type::INT4 => Box::new(
            as_integer(value)
                .and_then(|i| i32::try_from(i).ok())
                .ok_or_else(mismatch)?,
        ),
        Type::INT8 => Box::new(as_integer(value).ok_or_else(mismatch)?),
        Type::FLOAT4 => Box::new(as_real(value).ok_or_else(mismatch)? as f32),
        Type::FLOAT8 => Box::new(as_real(value).ok_or_else(mismatch)?),
        Type::DATE => Box::new(as_date(value).ok_or_else(mismatch)?),
        _ => Box::new(as_text(value)),
    };
    Ok(param)
}

fn typed_null(ty: &Type) -> Param {
    match *ty {
        Type::BOOL => Box::new(None::<bool>),
        Type::INT2 => Box::new(None::<i16>),
        Type::INT4 => Box::new(None::<i32>),
        Type::INT8 => Box::new(None::<i64>),
        Type::FLOAT4 => Box::new(None::<f32>),
        Type::FLOAT8 => Box::new(None::<f64>),
        Type::DATE => Box::new(None::<NaiveDate>),
        _ => Box::new(None::<String>),
    }
}

fn as_bool(value: &ColumnValue) -> Option<bool> {
    match value {
        ColumnValue::Integer(i) => Some(*i != 0),
        ColumnValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_integer(value: &ColumnValue) -> Option<i64> {
    match value {
        ColumnValue::Integer(i) => Some(*i),
        ColumnValue::Real(f) if f.fract() == 0.0 => Some(*f as i64),
        ColumnValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_real(value: &ColumnValue) -> Option<f64> {
    match value {
        ColumnValue::Integer(i) => Some(*i as f64),
        ColumnValue::Real(f) => Some(*f),
        ColumnValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_date(value: &ColumnValue) -> Option<NaiveDate> {
    match value {
        ColumnValue::Date(date) => Some(*date),
        ColumnValue::Text(text) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok(),
        _ => None,
    }
}

fn as_text(value: &ColumnValue) -> String {
    match value {
        ColumnValue::Null => String::new(),
        ColumnValue::Integer(i) => i.to_string(),
        ColumnValue::Real(f) => f.to_string(),
        ColumnValue::Text(text) => text.clone(),
        ColumnValue::Date(date) => date.format(DATE_FORMAT).to_string(),
    }
}

fn collect(columns: &[Column], rows: &[postgres::Row]) -> Result<QueryResult, StorageError> {
    let names = unique_column_names(columns.iter().map(|c| c.name().to_string()));

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Row::new();
        for (index, (name, column)) in names.iter().zip(columns).enumerate() {
            record.insert(name.clone(), cell_to_json(row, index, column.type_())?);
        }
        records.push(record);
    }

    Ok(QueryResult {
        columns: names,
        rows: records,
    })
}

/// Decodes one cell into JSON by its column type.
///
/// Types without a JSON mapping are read as text; cells that cannot be read
/// as text either become null.
fn cell_to_json(row: &postgres::Row, index: usize, ty: &Type) -> Result<Value, postgres::Error> {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(index)?.map(Value::from),
        Type::INT2 => row.try_get::<_, Option<i16>>(index)?.map(Value::from),
        Type::INT4 => row.try_get::<_, Option<i32>>(index)?.map(Value::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(index)?.map(Value::from),
        Type::OID => row.try_get::<_, Option<u32>>(index)?.map(Value::from),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)?
            .and_then(|f| Number::from_f64(f64::from(f)))
            .map(Value::Number),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(index)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(index)?
            .map(|d| Value::String(d.format(DATE_FORMAT).to_string())),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(index)?
            .map(|t| Value::String(t.to_string())),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(index)?,
        _ => row
            .try_get::<_, Option<String>>(index)
            .ok()
            .flatten()
            .map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}
