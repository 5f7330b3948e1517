//! Shared test helpers for roster_core tests.

#![allow(dead_code)]

use roster_core::{RecordStore, SqliteConnector, ValidatedRecord, validate_employee};
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

/// Create a test database holding the employees table plus any extra DDL.
///
/// Returns the TempDir (must be kept alive) and a store connected to it.
pub fn create_store(extra_ddl: &str) -> (TempDir, RecordStore) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("roster.db");

    let connection = Connection::open(&path).expect("Failed to create database");
    connection
        .execute_batch(EMPLOYEES_DDL)
        .expect("Failed to create employees table");
    connection
        .execute_batch(extra_ddl)
        .expect("Failed to run extra DDL");

    (dir, RecordStore::new(SqliteConnector::new(path)))
}

/// Open a direct connection to the test database, bypassing the store.
pub fn connect(dir: &TempDir) -> Connection {
    Connection::open(dir.path().join("roster.db")).expect("Failed to open database")
}

/// Count rows in a table directly.
pub fn count_rows(dir: &TempDir, table: &str) -> i64 {
    connect(dir)
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .expect("Failed to count rows")
}

/// A valid employee payload.
pub fn employee_payload(first_name: &str, last_name: &str) -> Map<String, Value> {
    json!({
        "first_name": first_name,
        "last_name": last_name,
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

/// A validated employee record.
pub fn employee(first_name: &str, last_name: &str) -> ValidatedRecord {
    validate_employee(&employee_payload(first_name, last_name)).expect("valid employee")
}
