//! Get records tool implementation.

use rmcp::model::CallToolResult;
use rmcp::schemars;
use roster_core::{ColumnValue, RecordStore, StoreError};
use serde::Deserialize;
use serde_json::Value;

use super::{default_table, rows_success, store_failure};

/// Parameters for the get_records tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GetRecordsParams {
    /// The name of the table to get records from. Defaults to "employees".
    #[serde(default = "default_table")]
    pub table_name: String,

    /// The column name to filter records by (e.g., "eid", "department").
    /// Must be a known column of the table.
    pub criteria: Option<String>,

    /// The value the criteria column must equal. Ignored unless criteria is set.
    pub value: Option<Value>,
}

/// Execute the get_records tool.
///
/// Returns every row of the table, or only rows where `criteria = value`
/// when both are given.
pub fn execute(store: &RecordStore, params: &GetRecordsParams) -> CallToolResult {
    let filter_value = match params
        .value
        .as_ref()
        .map(|v| ColumnValue::from_json("value", v))
        .transpose()
    {
        Ok(value) => value,
        Err(e) => return store_failure(&StoreError::Validation(e)),
    };

    match store.read(
        &params.table_name,
        params.criteria.as_deref(),
        filter_value.as_ref(),
    ) {
        Ok(rows) => rows_success(rows),
        Err(e) => store_failure(&e),
    }
}
