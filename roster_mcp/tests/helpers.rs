//! Shared test helpers for roster_mcp tests.

#![allow(dead_code)]

use rmcp::model::{CallToolResult, RawContent};
use roster_core::{RecordStore, SqliteConnector};
use rusqlite::Connection;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

pub const EMPLOYEES_DDL: &str = r#"
CREATE TABLE employees (
    eid INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    location TEXT NOT NULL,
    role TEXT NOT NULL,
    department TEXT NOT NULL,
    joined_date TEXT NOT NULL,
    dob TEXT NOT NULL,
    supervisor_name TEXT
);
"#;

/// Extract the text content from a CallToolResult.
pub fn get_text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "Expected exactly one content item");
    match &result.content[0].raw {
        RawContent::Text(text_content) => text_content.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Parse the text content of a CallToolResult as JSON.
pub fn get_json(result: &CallToolResult) -> Value {
    serde_json::from_str(&get_text(result)).expect("Expected JSON content")
}

/// Check if the result is a success.
pub fn is_success(result: &CallToolResult) -> bool {
    result.is_error == Some(false)
}

/// Check if the result is an error.
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Create a test database with the employees table.
///
/// Returns the TempDir (must be kept alive) and a store connected to it.
pub fn create_store() -> (TempDir, RecordStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("roster.db");

    Connection::open(&path)
        .expect("Failed to create database")
        .execute_batch(EMPLOYEES_DDL)
        .expect("Failed to create employees table");

    (dir, RecordStore::new(SqliteConnector::new(path)))
}

/// Count employee rows directly, bypassing the store.
pub fn count_employees(dir: &TempDir) -> i64 {
    Connection::open(dir.path().join("roster.db"))
        .expect("Failed to open database")
        .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))
        .expect("Failed to count rows")
}

/// A valid employee payload as sent by a client.
pub fn john_doe() -> Map<String, Value> {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "location": "Noida",
        "role": "Associate",
        "department": "IT",
        "joined_date": "2021-01-01",
        "dob": "1990-01-01"
    })
    .as_object()
    .cloned()
    .expect("payload is an object")
}

/// Insert an employee through the create_record tool and return its eid.
pub fn insert_employee(store: &RecordStore, first_name: &str) -> i64 {
    let mut payload = john_doe();
    payload.insert("first_name".to_string(), json!(first_name));

    let params = roster_mcp::tools::CreateRecordParams { fields: payload };
    let result = roster_mcp::tools::create_record::execute(store, &params);
    assert!(is_success(&result), "create failed: {}", get_text(&result));

    get_json(&result)["eid"].as_i64().expect("eid is an integer")
}
