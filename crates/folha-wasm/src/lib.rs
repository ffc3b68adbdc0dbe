//! WASM bindings for payroll-slip extraction.
//!
//! The browser page keeps the `File` objects and calls the provider itself;
//! these bindings supply the upload filter, the request contract, response
//! parsing, record checks and the CSV export.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use folha_core::export::{export_filename as core_export_filename, to_csv};
use folha_core::extraction::{parse_records, response_schema, SYSTEM_INSTRUCTION, TASK_INSTRUCTION};
use folha_core::models::document::{Document, PDF_MEDIA_TYPE};
use folha_core::models::payroll::{column_keys as core_column_keys, column_labels as core_column_labels, PayrollRecord};
use folha_core::upload::UploadCollector;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn records_from_js(records: JsValue) -> Result<Vec<PayrollRecord>, JsValue> {
    serde_wasm_bindgen::from_value(records).map_err(to_js_error)
}

/// Whether files of this declared media type are accepted for extraction.
#[wasm_bindgen]
pub fn is_accepted_media_type(media_type: &str) -> bool {
    media_type == PDF_MEDIA_TYPE
}

/// JSON response schema sent with every request, as a JSON string.
#[wasm_bindgen]
pub fn response_schema_json() -> String {
    response_schema().to_string()
}

/// System instruction sent with every request.
#[wasm_bindgen]
pub fn system_instruction() -> String {
    SYSTEM_INSTRUCTION.to_string()
}

/// Per-document instruction sent next to the file.
#[wasm_bindgen]
pub fn task_instruction() -> String {
    TASK_INSTRUCTION.to_string()
}

/// Column keys in schema order.
#[wasm_bindgen]
pub fn column_keys() -> Result<JsValue, JsValue> {
    let keys: Vec<&str> = core_column_keys().collect();
    serde_wasm_bindgen::to_value(&keys).map_err(to_js_error)
}

/// Column labels in schema order.
#[wasm_bindgen]
pub fn column_labels() -> Result<JsValue, JsValue> {
    let labels: Vec<&str> = core_column_labels().collect();
    serde_wasm_bindgen::to_value(&labels).map_err(to_js_error)
}

/// Parse the model's response text into records.
#[wasm_bindgen]
pub fn parse_response(text: &str) -> Result<JsValue, JsValue> {
    let records = parse_records(text).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&records).map_err(to_js_error)
}

/// Serialize records to the semicolon-delimited CSV export.
#[wasm_bindgen]
pub fn records_to_csv(records: JsValue) -> Result<String, JsValue> {
    let records = records_from_js(records)?;
    to_csv(&records).map_err(to_js_error)
}

/// Export file name for an ISO date (`YYYY-MM-DD`).
#[wasm_bindgen]
pub fn export_filename(iso_date: &str) -> Result<String, JsValue> {
    let date = chrono::NaiveDate::parse_from_str(iso_date, "%Y-%m-%d").map_err(to_js_error)?;
    Ok(core_export_filename(date))
}

#[derive(Serialize)]
struct RowIssues {
    row: usize,
    id: String,
    issues: Vec<String>,
}

/// Check records and return the rows that have issues.
#[wasm_bindgen]
pub fn validate_records(records: JsValue) -> Result<JsValue, JsValue> {
    let records = records_from_js(records)?;

    let rows: Vec<RowIssues> = records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| {
            let issues = record.validate();
            (!issues.is_empty()).then(|| RowIssues {
                row,
                id: record.id.clone(),
                issues,
            })
        })
        .collect();

    serde_wasm_bindgen::to_value(&rows).map_err(to_js_error)
}

/// File metadata handed over from a drop or file-picker event.
#[derive(Deserialize)]
struct CandidateJs {
    name: String,
    #[serde(rename = "type")]
    media_type: String,
}

/// Selection list for the upload area.
#[wasm_bindgen]
pub struct UploadSelection {
    collector: UploadCollector,
}

#[wasm_bindgen]
impl UploadSelection {
    /// Create an empty selection.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            collector: UploadCollector::new(),
        }
    }

    /// Accept candidate files (`[{name, type}]`) and return the indices of
    /// those that were accepted, in input order.
    ///
    /// The caller forwards exactly those `File` objects to extraction.
    #[wasm_bindgen]
    pub fn accept(&mut self, candidates: JsValue) -> Result<JsValue, JsValue> {
        let candidates: Vec<CandidateJs> =
            serde_wasm_bindgen::from_value(candidates).map_err(to_js_error)?;

        if self.collector.is_locked() {
            return serde_wasm_bindgen::to_value(&Vec::<usize>::new()).map_err(to_js_error);
        }

        let indices: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| is_accepted_media_type(&c.media_type))
            .map(|(i, _)| i)
            .collect();

        let documents = candidates
            .into_iter()
            .map(|c| Document::new(c.name, c.media_type, Vec::new()))
            .collect();
        self.collector.accept(documents);

        serde_wasm_bindgen::to_value(&indices).map_err(to_js_error)
    }

    /// Remove an entry from the selection list.
    #[wasm_bindgen]
    pub fn remove(&mut self, index: usize) -> bool {
        self.collector.remove(index).is_some()
    }

    /// Names of the selected files.
    #[wasm_bindgen]
    pub fn names(&self) -> Result<JsValue, JsValue> {
        let names: Vec<&str> = self
            .collector
            .selected()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        serde_wasm_bindgen::to_value(&names).map_err(to_js_error)
    }

    /// Disable uploads and removals while a batch is processing.
    #[wasm_bindgen]
    pub fn lock(&mut self) {
        self.collector.lock();
    }

    /// Re-enable uploads and removals.
    #[wasm_bindgen]
    pub fn unlock(&mut self) {
        self.collector.unlock();
    }

    /// Whether uploads are disabled.
    #[wasm_bindgen]
    pub fn is_locked(&self) -> bool {
        self.collector.is_locked()
    }
}

impl Default for UploadSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_media_type_filter() {
        assert!(is_accepted_media_type("application/pdf"));
        assert!(!is_accepted_media_type("image/png"));
    }

    #[wasm_bindgen_test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("2025-01-31").unwrap(),
            "extracao_folha_2025-01-31.csv"
        );
        assert!(export_filename("31/01/2025").is_err());
    }

    #[wasm_bindgen_test]
    fn test_parse_then_export() {
        let records = parse_response(r#"[{"id": "1", "nome": "ANA"}]"#).unwrap();
        let csv = records_to_csv(records).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().starts_with("1;ANA;-;"));
    }

    #[wasm_bindgen_test]
    fn test_selection_accepts_only_pdfs() {
        let mut selection = UploadSelection::new();
        let candidates = serde_wasm_bindgen::to_value(&vec![
            serde_json::json!({"name": "a.pdf", "type": "application/pdf"}),
            serde_json::json!({"name": "b.png", "type": "image/png"}),
        ])
        .unwrap();

        let accepted: Vec<usize> =
            serde_wasm_bindgen::from_value(selection.accept(candidates).unwrap()).unwrap();
        assert_eq!(accepted, vec![0]);

        let names: Vec<String> = serde_wasm_bindgen::from_value(selection.names().unwrap()).unwrap();
        assert_eq!(names, vec!["a.pdf"]);
    }
}
