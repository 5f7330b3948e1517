//! MCP tool implementations for Roster.
//!
//! Each tool decodes its parameters, calls the [`RecordStore`] and renders
//! the outcome as JSON text. Store failures become tool error results so the
//! caller can tell them apart from success.
//!
//! [`RecordStore`]: roster_core::RecordStore

pub mod create_record;
pub mod delete_record;
pub mod get_data;
pub mod get_records;
pub mod query_database;
pub mod update_record;

pub use create_record::CreateRecordParams;
pub use delete_record::DeleteRecordParams;
pub use get_data::GetDataParams;
pub use get_records::GetRecordsParams;
pub use query_database::QueryDatabaseParams;
pub use update_record::UpdateRecordParams;

use rmcp::model::{CallToolResult, Content};
use roster_core::{QueryResult, StoreError};
use serde_json::{Map, Value, json};

/// Table used when a read names none.
pub fn default_table() -> String {
    roster_core::EMPLOYEES_TABLE.to_string()
}

/// Name of the error category reported to callers.
pub fn error_kind(err: &StoreError) -> &'static str {
    match err {
        StoreError::Validation(_) => "ValidationError",
        StoreError::Storage(_) => "StorageError",
    }
}

/// A successful result carrying `value` as pretty JSON.
pub(crate) fn json_success(value: Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!("{:#}", value))])
}

/// A successful result carrying tabular rows.
pub(crate) fn rows_success(result: QueryResult) -> CallToolResult {
    json_success(json!({
        "columns": result.columns,
        "rows": result.rows,
    }))
}

/// An error result describing a store failure.
pub(crate) fn store_failure(err: &StoreError) -> CallToolResult {
    store_failure_with(err, Map::new())
}

/// An error result describing a store failure, with extra JSON fields.
pub(crate) fn store_failure_with(err: &StoreError, mut extra: Map<String, Value>) -> CallToolResult {
    extra.insert("error".to_string(), json!(error_kind(err)));
    extra.insert("message".to_string(), json!(err.to_string()));
    CallToolResult::error(vec![Content::text(format!("{:#}", Value::Object(extra)))])
}
