//! Tabular query results.

use rusqlite::{Params, Statement};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::value::value_ref_to_json;

/// A single result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Rows returned by a read, with their column names in statement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Runs `statement` and collects every row.
    pub(crate) fn collect<P: Params>(
        statement: &mut Statement<'_>,
        params: P,
    ) -> rusqlite::Result<Self> {
        let columns = unique_column_names(statement.column_names().into_iter().map(String::from));

        let mut rows = Vec::new();
        let mut cursor = statement.query(params)?;
        while let Some(row) = cursor.next()? {
            let mut record = Row::new();
            for (index, name) in columns.iter().enumerate() {
                record.insert(name.clone(), value_ref_to_json(row.get_ref(index)?));
            }
            rows.push(record);
        }

        Ok(Self { columns, rows })
    }
}

/// Makes result column names unique, keeping the first occurrence as is.
///
/// A repeated name (as in `SELECT a.eid, b.eid`) gets a `_2`, `_3`, ...
/// suffix so no cell is lost when rows are keyed by name.
pub(crate) fn unique_column_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 2;
        while unique.contains(&candidate) {
            candidate = format!("{}_{}", name, suffix);
            suffix += 1;
        }
        unique.push(candidate);
    }
    unique
}
