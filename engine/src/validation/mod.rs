//! JSON Schema validation for saved tables.
//!
//! The snapshot schema is embedded at compile time from
//! `schemas/promo-table.json` (draft 7). A snapshot is an array of rows; each
//! row holds six cells, optionally followed by three error flags:
//!
//! ```json
//! [["SKU-1", "12,50", "15.04.2025", "", "99", "1", false, false, false]]
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static SNAPSHOT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/promo-table.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check, no messages.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// The embedded snapshot schema.
pub fn snapshot_schema() -> &'static Value {
    &SNAPSHOT_SCHEMA
}

/// Validate a saved table against the snapshot schema.
pub fn validate_snapshot(data: &Value) -> Result<(), Vec<String>> {
    validate(&SNAPSHOT_SCHEMA, data)
}

pub fn is_valid_snapshot(data: &Value) -> bool {
    is_valid(&SNAPSHOT_SCHEMA, data)
}
