//! Update record tool implementation.

use rmcp::model::CallToolResult;
use rmcp::schemars;
use roster_core::{ColumnValue, RecordStore, StoreError, ValidationError};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{json_success, store_failure, store_failure_with};

/// Parameters for the update_record tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecordParams {
    /// The name of the table to update the record in.
    pub table_name: String,

    /// The ID (eid) of the record to update.
    pub record_id: i64,

    /// Column names mapped to their new values. Must not be empty.
    pub update_data: Map<String, Value>,
}

/// Execute the update_record tool.
///
/// Returns the number of rows updated. An unknown ID updates 0 rows, which
/// is not an error.
pub fn execute(store: &RecordStore, params: &UpdateRecordParams) -> CallToolResult {
    let fields = match ColumnValue::map_from_json(&params.update_data) {
        Ok(fields) => fields,
        Err(e) => return store_failure(&StoreError::Validation(e)),
    };

    match store.update(&params.table_name, params.record_id, &fields) {
        Ok(rows_affected) => json_success(json!({ "rows_affected": rows_affected })),
        Err(e @ StoreError::Validation(ValidationError::EmptyUpdate)) => {
            let mut extra = Map::new();
            extra.insert("rows_affected".to_string(), json!(0));
            store_failure_with(&e, extra)
        }
        Err(e) => store_failure(&e),
    }
}
