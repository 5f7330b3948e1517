//! Get data tool implementation.

use rmcp::model::CallToolResult;
use rmcp::schemars;
use roster_core::{ColumnValue, RecordStore};
use serde::Deserialize;

use super::{rows_success, store_failure};

/// Parameters for the get_data tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GetDataParams {
    /// The name of the table to get data from.
    pub table_name: String,

    /// The column name to filter data by.
    pub criteria: Option<String>,

    /// The value to filter data by, compared as text.
    pub value: Option<String>,
}

/// Execute the get_data tool.
pub fn execute(store: &RecordStore, params: &GetDataParams) -> CallToolResult {
    let filter_value = params.value.clone().map(ColumnValue::Text);

    match store.read(
        &params.table_name,
        params.criteria.as_deref(),
        filter_value.as_ref(),
    ) {
        Ok(rows) => rows_success(rows),
        Err(e) => store_failure(&e),
    }
}
