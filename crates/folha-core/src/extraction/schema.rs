//! JSON response schema constraining the model output.

use serde_json::{json, Map, Value};

use crate::models::payroll::{column_keys, COLUMNS};

/// Schema for an array of payroll records with all 25 string fields required.
///
/// Uses the provider's OpenAPI-subset type names (`ARRAY`, `OBJECT`, `STRING`).
pub fn response_schema() -> Value {
    let mut properties = Map::new();
    for column in &COLUMNS {
        properties.insert(
            column.key.to_string(),
            json!({
                "type": "STRING",
                "description": column.description,
            }),
        );
    }

    let keys: Vec<&str> = column_keys().collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": keys,
            "propertyOrdering": keys,
        }
    })
}
