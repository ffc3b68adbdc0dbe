//! Payroll extraction through a hosted generative model.

#[cfg(feature = "native")]
mod gemini;
pub mod prompt;
pub mod schema;

#[cfg(feature = "native")]
pub use gemini::{GeminiExtractor, MISSING_API_KEY};
pub use prompt::{SUMMARY_MARKER, SYSTEM_INSTRUCTION, TASK_INSTRUCTION};
pub use schema::response_schema;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{FolhaError, Result};
use crate::models::document::Document;
use crate::models::payroll::PayrollRecord;

/// Trait for payroll extractors.
///
/// One call handles one document and returns its records in document order.
#[async_trait]
pub trait PayrollExtractor: Send + Sync {
    /// Extract all employee records from a document.
    async fn extract(&self, document: &Document) -> Result<Vec<PayrollRecord>>;
}

/// Parse the text returned by the model into records.
///
/// An empty body yields no records. Anything other than a JSON array of
/// objects is a response-shape error.
pub fn parse_records(text: &str) -> Result<Vec<PayrollRecord>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(FolhaError::ResponseShape(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(FolhaError::ResponseShape(format!(
                    "record {} is {}, expected an object",
                    i,
                    json_kind(&item)
                )));
            }
            serde_json::from_value(item)
                .map_err(|e| FolhaError::ResponseShape(format!("record {}: {}", i, e)))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payroll::PLACEHOLDER;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_body_yields_no_records() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("  \n").unwrap().is_empty());
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn test_records_keep_document_order_and_formatting() {
        let body = r#"[
            {"id": "10", "nome": "ANA LIMA", "salario": "1.412,00", "base_calc_inss": "1.412,00", "inss_patronal_20": "282,40"},
            {"id": "11", "nome": "BRUNO REIS", "salario": "3.000,00", "indeniz": "4.500,00"}
        ]"#;
        let records = parse_records(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].nome, "ANA LIMA");
        assert_eq!(records[0].salario, "1.412,00");
        assert_eq!(records[1].id, "11");
        assert_eq!(records[1].indeniz, "4.500,00");
        assert_eq!(records[1].inss_patronal_20, PLACEHOLDER);
    }

    #[test]
    fn test_every_record_has_all_fields() {
        let records = parse_records(r#"[{"id": "1"}, {}]"#).unwrap();
        for record in &records {
            assert_eq!(record.values().len(), 25);
            assert!(record.values().iter().all(|v| !v.is_empty()));
        }
    }

    #[test]
    fn test_malformed_json_is_shape_error() {
        let err = parse_records(r#"[{"id": "1""#).unwrap_err();
        assert!(matches!(err, FolhaError::ResponseShape(_)));
    }

    #[test]
    fn test_wrong_structure_is_shape_error() {
        assert!(matches!(
            parse_records(r#"{"id": "1"}"#).unwrap_err(),
            FolhaError::ResponseShape(_)
        ));
        assert!(matches!(
            parse_records(r#"["1", "2"]"#).unwrap_err(),
            FolhaError::ResponseShape(_)
        ));
        assert!(matches!(
            parse_records(r#"[{"id": 1}]"#).unwrap_err(),
            FolhaError::ResponseShape(_)
        ));
    }
}
