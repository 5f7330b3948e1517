mod helpers;

use roster_mcp::tools::get_records::{GetRecordsParams, execute};
use serde_json::json;

use helpers::{create_store, get_json, insert_employee, is_error, is_success};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_records_by_id() {
        let (_dir, store) = create_store();
        let eid = insert_employee(&store, "John");
        insert_employee(&store, "Jane");

        let params = GetRecordsParams {
            table_name: "employees".to_string(),
            criteria: Some("eid".to_string()),
            value: Some(json!(eid)),
        };

        let result = execute(&store, &params);

        assert!(is_success(&result));
        let body = get_json(&result);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["eid"], json!(eid));
        assert_eq!(rows[0]["first_name"], json!("John"));
        assert_eq!(rows[0]["last_name"], json!("Doe"));
        assert_eq!(rows[0]["location"], json!("Noida"));
        assert_eq!(rows[0]["role"], json!("Associate"));
        assert_eq!(rows[0]["department"], json!("IT"));
        assert_eq!(rows[0]["joined_date"], json!("2021-01-01"));
        assert_eq!(rows[0]["dob"], json!("1990-01-01"));
    }

    #[test]
    fn test_get_records_defaults_to_employees() {
        let (_dir, store) = create_store();
        insert_employee(&store, "John");
        insert_employee(&store, "Jane");

        let params: GetRecordsParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.table_name, "employees");

        let body = get_json(&execute(&store, &params));

        assert_eq!(body["rows"].as_array().unwrap().len(), 2);
        assert_eq!(body["columns"][0], json!("eid"));
    }

    #[test]
    fn test_get_records_no_match() {
        let (_dir, store) = create_store();
        insert_employee(&store, "John");

        let params = GetRecordsParams {
            table_name: "employees".to_string(),
            criteria: Some("department".to_string()),
            value: Some(json!("Finance")),
        };

        let result = execute(&store, &params);

        assert!(is_success(&result));
        assert_eq!(get_json(&result)["rows"], json!([]));
    }

    #[test]
    fn test_get_records_rejects_object_value() {
        let (_dir, store) = create_store();

        let params = GetRecordsParams {
            table_name: "employees".to_string(),
            criteria: Some("eid".to_string()),
            value: Some(json!({"$gt": 1})),
        };

        let result = execute(&store, &params);

        assert!(is_error(&result));
        assert_eq!(get_json(&result)["error"], json!("ValidationError"));
    }

    #[test]
    fn test_get_records_rejects_injected_column() {
        let (_dir, store) = create_store();
        insert_employee(&store, "John");

        let params = GetRecordsParams {
            table_name: "employees".to_string(),
            criteria: Some("1 = 1 OR eid".to_string()),
            value: Some(json!(1)),
        };

        let result = execute(&store, &params);

        assert!(is_error(&result));
        assert_eq!(get_json(&result)["error"], json!("ValidationError"));
    }

    #[test]
    fn test_get_records_unknown_table() {
        let (_dir, store) = create_store();

        let params = GetRecordsParams {
            table_name: "departments".to_string(),
            criteria: None,
            value: None,
        };

        let result = execute(&store, &params);

        assert!(is_error(&result));
        assert_eq!(get_json(&result)["error"], json!("StorageError"));
    }
}
