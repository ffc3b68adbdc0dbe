//! Core library for payroll-slip (holerite) extraction.
//!
//! This crate provides:
//! - The 25-column payroll record schema and its JSON response schema
//! - The extraction policy sent to the generative model
//! - A Gemini extraction client behind the [`PayrollExtractor`] trait
//! - Upload filtering and sequential batch orchestration
//! - Table rendering and semicolon-delimited CSV export

pub mod batch;
pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
pub mod rules;
pub mod upload;

pub use batch::{extract_batch, BatchReport, ExtractionSession, ProcessingState};
pub use error::{FolhaError, Result};
pub use export::{export_filename, render_table, to_csv, to_json, ExportFormat};
pub use extraction::{parse_records, response_schema, PayrollExtractor};
#[cfg(feature = "native")]
pub use extraction::GeminiExtractor;
pub use models::config::{FolhaConfig, ProviderConfig};
pub use models::document::{media_type_of, Document, PDF_MEDIA_TYPE};
pub use models::payroll::{PayrollRecord, COLUMNS, FIELD_COUNT, PLACEHOLDER};
pub use upload::UploadCollector;
