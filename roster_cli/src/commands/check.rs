//! Check command: verifies the store can be reached.

use roster_core::{EMPLOYEES_TABLE, StoreConfig};
use serde_json::Value;

use super::open_store;
use crate::errors::CliError;
use crate::ui;

/// Open a connection and count employees.
pub fn check(config: &StoreConfig) -> Result<(), CliError> {
    ui::header("Checking store");
    let store = open_store(config)?;

    let query = format!("SELECT COUNT(*) AS total FROM {}", EMPLOYEES_TABLE);
    let result = store.raw_query(&query).map_err(|e| {
        ui::error_with_details(
            &format!("Could not query {}", config.redacted_url()),
            &e.to_string(),
        );
        CliError::StoreError
    })?;

    let total = result
        .rows
        .first()
        .and_then(|row| row.get("total"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    ui::success(&format!(
        "Store {} is reachable ({} {})",
        config.redacted_url(),
        total,
        EMPLOYEES_TABLE
    ));
    Ok(())
}
