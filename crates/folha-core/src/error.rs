//! Error types for the folha-core library.

use thiserror::Error;

/// Message shown to the user when a batch fails for any reason other than
/// configuration.
pub const GENERIC_FAILURE_MESSAGE: &str = "Ocorreu um erro ao processar os arquivos.";

/// Main error type for the folha library.
#[derive(Error, Debug)]
pub enum FolhaError {
    /// Missing credential or otherwise unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or provider-side rejection.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider answered with something that is not an array of payroll records.
    #[error("unexpected response: {0}")]
    ResponseShape(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FolhaError {
    /// Human-readable message for the error banner.
    ///
    /// Configuration problems are shown as-is; everything else gets the
    /// generic failure text followed by the underlying cause.
    pub fn user_message(&self) -> String {
        match self {
            FolhaError::Config(msg) => msg.clone(),
            other => format!("{} ({})", GENERIC_FAILURE_MESSAGE, other),
        }
    }
}

impl From<serde_json::Error> for FolhaError {
    fn from(e: serde_json::Error) -> Self {
        FolhaError::ResponseShape(e.to_string())
    }
}

/// Result type for the folha library.
pub type Result<T> = std::result::Result<T, FolhaError>;
