//! Query database tool implementation.

use log::debug;
use rmcp::model::CallToolResult;
use rmcp::schemars;
use roster_core::RecordStore;
use serde::Deserialize;

use super::{rows_success, store_failure};

/// Parameters for the query_database tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct QueryDatabaseParams {
    /// The SQL query to execute, run verbatim.
    pub query: String,

    /// The table the query is about. Informational only; not used to run the query.
    #[serde(default)]
    pub table: Option<String>,
}

/// Execute the query_database tool.
///
/// The query text is executed as given. No parameters are bound and the
/// table allow-list does not apply.
pub fn execute(store: &RecordStore, params: &QueryDatabaseParams) -> CallToolResult {
    if let Some(table) = &params.table {
        debug!("query_database called for table '{}'", table);
    }

    match store.raw_query(&params.query) {
        Ok(rows) => rows_success(rows),
        Err(e) => store_failure(&e),
    }
}
