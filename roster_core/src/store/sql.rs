//! Statement text builders.
//!
//! Only identifiers are written into statement text, double-quoted after
//! checking they are plain names. Values are always bound as numbered
//! parameters in the engine's placeholder syntax.

use crate::schema::ValidationError;

/// Placeholder syntax of the engine a statement is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?1, ?2, ...`
    Sqlite,
    /// `$1, $2, ...`
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{}", index),
            Dialect::Postgres => format!("${}", index),
        }
    }
}

/// Quotes a table or column name after checking it is a plain identifier.
pub fn quote_identifier(name: &str) -> Result<String, ValidationError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(format!("\"{}\"", name))
    } else {
        Err(ValidationError::InvalidIdentifier(name.to_string()))
    }
}

/// `SELECT * FROM table [WHERE column = ?1]`
pub fn select(
    dialect: Dialect,
    table: &str,
    filter_column: Option<&str>,
) -> Result<String, ValidationError> {
    let mut sql = format!("SELECT * FROM {}", quote_identifier(table)?);
    if let Some(column) = filter_column {
        sql.push_str(&format!(
            " WHERE {} = {}",
            quote_identifier(column)?,
            dialect.placeholder(1)
        ));
    }
    Ok(sql)
}

/// `INSERT INTO table (c1, ...) VALUES (?1, ...) RETURNING key`
pub fn insert_returning(
    dialect: Dialect,
    table: &str,
    columns: &[&str],
    key: &str,
) -> Result<String, ValidationError> {
    let names = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| dialect.placeholder(i)).collect();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quote_identifier(table)?,
        names.join(", "),
        placeholders.join(", "),
        quote_identifier(key)?
    ))
}

/// `UPDATE table SET c1 = ?1, ... WHERE key = ?N`
///
/// The key parameter is numbered after the columns.
pub fn update(
    dialect: Dialect,
    table: &str,
    columns: &[&str],
    key: &str,
) -> Result<String, ValidationError> {
    if columns.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Ok(format!(
                "{} = {}",
                quote_identifier(c)?,
                dialect.placeholder(i + 1)
            ))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quote_identifier(table)?,
        assignments.join(", "),
        quote_identifier(key)?,
        dialect.placeholder(columns.len() + 1)
    ))
}

/// `DELETE FROM table WHERE key = ?1`
pub fn delete(dialect: Dialect, table: &str, key: &str) -> Result<String, ValidationError> {
    Ok(format!(
        "DELETE FROM {} WHERE {} = {}",
        quote_identifier(table)?,
        quote_identifier(key)?,
        dialect.placeholder(1)
    ))
}
