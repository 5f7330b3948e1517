//! Create record tool implementation.

use std::borrow::Cow;

use log::debug;
use rmcp::model::CallToolResult;
use rmcp::schemars::{self, JsonSchema, Schema, SchemaGenerator};
use roster_core::schema::employee_json_schema;
use roster_core::{RecordStore, StoreError, validate_employee};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{json_success, store_failure};

/// Key some clients wrap the employee fields in.
const WRAPPER_KEY: &str = "employee_data";

/// Parameters for the create_record tool: the employee fields themselves.
///
/// The fields are kept as raw JSON so every problem can be reported by the
/// employee validator rather than by the decoder.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct CreateRecordParams {
    pub fields: Map<String, Value>,
}

impl CreateRecordParams {
    /// The employee payload, unwrapping `{"employee_data": {...}}` if present.
    pub fn payload(&self) -> &Map<String, Value> {
        if self.fields.len() == 1 {
            if let Some(Value::Object(inner)) = self.fields.get(WRAPPER_KEY) {
                return inner;
            }
        }
        &self.fields
    }
}

impl JsonSchema for CreateRecordParams {
    fn schema_name() -> Cow<'static, str> {
        "CreateRecordParams".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        match employee_json_schema() {
            Value::Object(schema) => Schema::from(schema),
            _ => schemars::json_schema!({ "type": "object" }),
        }
    }
}

/// Execute the create_record tool.
///
/// Validates the payload, then inserts it. Invalid payloads never reach the
/// store.
pub fn execute(store: &RecordStore, params: &CreateRecordParams) -> CallToolResult {
    let record = match validate_employee(params.payload()) {
        Ok(record) => record,
        Err(e) => return store_failure(&StoreError::Validation(e)),
    };

    match store.create(&record) {
        Ok(eid) => {
            debug!("Created employee {}", eid);
            json_success(json!({ "eid": eid }))
        }
        Err(e) => store_failure(&e),
    }
}
