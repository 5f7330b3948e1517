//! Field definitions for the employee table.

use serde_json::{Map, Value, json};

/// The table employee records are created in.
pub const EMPLOYEES_TABLE: &str = "employees";

/// The store-generated identifier column.
pub const EMPLOYEE_ID_COLUMN: &str = "eid";

pub const LOCATIONS: &[&str] = &["Noida", "Gurgaon", "Bangalore", "Hyderabad"];

pub const ROLES: &[&str] = &["Manager", "Associate", "Supervisor", "Assistant Manager"];

pub const DEPARTMENTS: &[&str] = &["HR", "IT", "Finance", "Marketing"];

/// The kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text restricted to a fixed set of values (matched exactly).
    Enum(&'static [&'static str]),
    /// A calendar date written as `YYYY-MM-DD`.
    Date,
}

/// Definition of a single employee field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
    pub example: &'static str,
}

impl FieldSpec {
    /// Renders the JSON schema for this field as advertised to tool clients.
    pub fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("description".to_string(), json!(self.description));
        schema.insert("examples".to_string(), json!([self.example]));

        match self.kind {
            FieldKind::Text if self.required => {
                schema.insert("type".to_string(), json!("string"));
            }
            FieldKind::Text => {
                schema.insert("type".to_string(), json!(["string", "null"]));
            }
            FieldKind::Enum(allowed) => {
                schema.insert("type".to_string(), json!("string"));
                schema.insert("enum".to_string(), json!(allowed));
            }
            FieldKind::Date => {
                schema.insert("type".to_string(), json!("string"));
                schema.insert("format".to_string(), json!("date"));
            }
        }

        Value::Object(schema)
    }
}

/// All employee fields, in insertion column order.
pub const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "first_name",
        kind: FieldKind::Text,
        required: true,
        description: "First name of the employee",
        example: "John",
    },
    FieldSpec {
        name: "last_name",
        kind: FieldKind::Text,
        required: true,
        description: "Last name of the employee",
        example: "Doe",
    },
    FieldSpec {
        name: "location",
        kind: FieldKind::Enum(LOCATIONS),
        required: true,
        description: "Location of the employee",
        example: "Noida",
    },
    FieldSpec {
        name: "role",
        kind: FieldKind::Enum(ROLES),
        required: true,
        description: "Role of the employee",
        example: "Associate",
    },
    FieldSpec {
        name: "department",
        kind: FieldKind::Enum(DEPARTMENTS),
        required: true,
        description: "Department of the employee",
        example: "IT",
    },
    FieldSpec {
        name: "joined_date",
        kind: FieldKind::Date,
        required: true,
        description: "Joining date of the employee (YYYY-MM-DD)",
        example: "2021-01-01",
    },
    FieldSpec {
        name: "dob",
        kind: FieldKind::Date,
        required: true,
        description: "Date of birth of the employee (YYYY-MM-DD)",
        example: "1990-01-01",
    },
    FieldSpec {
        name: "supervisor_name",
        kind: FieldKind::Text,
        required: false,
        description: "Supervisor name of the employee",
        example: "Jane Doe",
    },
];

/// Looks up a field definition by name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    EMPLOYEE_FIELDS.iter().find(|spec| spec.name == name)
}

/// JSON schema of a complete employee payload.
///
/// Extra properties are rejected, mirroring the validator.
pub fn employee_json_schema() -> Value {
    let properties: Map<String, Value> = EMPLOYEE_FIELDS
        .iter()
        .map(|spec| (spec.name.to_string(), spec.json_schema()))
        .collect();

    let required: Vec<&str> = EMPLOYEE_FIELDS
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
