//! Delete record tool implementation.

use rmcp::model::CallToolResult;
use rmcp::schemars;
use roster_core::RecordStore;
use serde::Deserialize;
use serde_json::json;

use super::{json_success, store_failure};

/// Parameters for the delete_record tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecordParams {
    /// The name of the table to delete the record from.
    pub table_name: String,

    /// The ID (eid) of the record to delete.
    pub record_id: i64,
}

/// Execute the delete_record tool.
pub fn execute(store: &RecordStore, params: &DeleteRecordParams) -> CallToolResult {
    match store.delete(&params.table_name, params.record_id) {
        Ok(rows_affected) => json_success(json!({ "rows_affected": rows_affected })),
        Err(e) => store_failure(&e),
    }
}
