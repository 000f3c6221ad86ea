//! Payload checks applied before a dataset is stored. Shape and identity are separate
//! calls; the caller runs them in order and maps each to its own failure.

use serde::Serialize;

use crate::catalog::TableId;
use crate::{DatasetError, DatasetResult, Row, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        ValidationResult {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Turn a failed check into an error built from the collected messages.
    pub fn into_result<F>(self, to_error: F) -> DatasetResult<()>
    where
        F: FnOnce(Vec<String>) -> DatasetError,
    {
        if self.is_valid {
            Ok(())
        } else {
            Err(to_error(self.errors))
        }
    }
}

pub fn is_known_table_id(table_id: &str) -> bool {
    table_id.parse::<TableId>().is_ok()
}

fn known_table_ids() -> String {
    TableId::ALL
        .iter()
        .map(TableId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty_str<'a>(payload: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(serde_json::Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Structural check of a dataset payload, independent of any table schema. All
/// violations are collected.
pub fn validate_payload_shape(payload: &serde_json::Value) -> ValidationResult {
    if !payload.is_object() {
        return ValidationResult::from_errors(vec![String::from(
            "Invalid payload: must be an object",
        )]);
    }

    let mut errors = Vec::new();

    let table_id = non_empty_str(payload, "tableId");
    if table_id.is_none() {
        errors.push(String::from("Missing or invalid required field: tableId"));
    }

    if non_empty_str(payload, "title").is_none() {
        errors.push(String::from("Missing or invalid required field: title"));
    }

    match payload.get("rows").and_then(serde_json::Value::as_array) {
        None => errors.push(String::from(
            "Missing or invalid required field: rows (must be an array)",
        )),
        Some(rows) => {
            for (idx, row) in rows.iter().enumerate() {
                if !row.is_object() {
                    errors.push(format!("rows[{}] must be an object", idx));
                }
            }
        }
    }

    if let Some(table_id) = table_id {
        if !is_known_table_id(table_id) {
            errors.push(format!(
                "Invalid tableId: {}. Must be one of: {}",
                table_id,
                known_table_ids()
            ));
        }
    }

    ValidationResult::from_errors(errors)
}

/// The table named in the route must be the table named in the payload.
pub fn validate_identity_match(route_table_id: &str, payload_table_id: &str) -> ValidationResult {
    if route_table_id != payload_table_id {
        return ValidationResult::from_errors(vec![format!(
            "TableId mismatch: URL contains '{}' but payload contains '{}'",
            route_table_id, payload_table_id
        )]);
    }
    ValidationResult::ok()
}

pub fn validate_required_fields(row: &Row, required: &[String]) -> ValidationResult {
    let errors = required
        .iter()
        .filter(|field| matches!(row.get(field.as_str()), None | Some(Value::Null)))
        .map(|field| format!("Missing required field: {}", field))
        .collect();
    ValidationResult::from_errors(errors)
}
