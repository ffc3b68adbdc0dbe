//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportFormat;

/// Default provider endpoint (Gemini REST API).
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for extraction.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Main configuration for the folha pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolhaConfig {
    /// Generative model provider configuration.
    pub provider: ProviderConfig,

    /// Result export configuration.
    pub export: ExportConfig,
}

/// Provider connection settings.
///
/// The credential is carried here and handed to the extraction client at
/// construction time; the client never reads the environment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub endpoint: String,

    /// Model identifier.
    pub model: String,

    /// API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The configured API key, if it is non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the CSV export is written to (current directory if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Output format used when none is given on the command line.
    pub format: ExportFormat,
}

impl FolhaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Copy of the configuration with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("********".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FolhaConfig =
            serde_json::from_str(r#"{"provider": {"model": "gemini-2.5-pro"}}"#).unwrap();
        assert_eq!(config.provider.model, "gemini-2.5-pro");
        assert_eq!(config.provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert!(config.provider.api_key().is_none());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let provider = ProviderConfig::default().with_api_key("   ");
        assert!(provider.api_key().is_none());
        let provider = ProviderConfig::default().with_api_key("abc");
        assert_eq!(provider.api_key(), Some("abc"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FolhaConfig::default();
        config.provider = config.provider.with_model("custom-model");
        config.save(&path).unwrap();

        let loaded = FolhaConfig::from_file(&path).unwrap();
        assert_eq!(loaded.provider.model, "custom-model");
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = FolhaConfig::default();
        config.provider = config.provider.with_api_key("secret");
        let shown = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("secret"));
    }
}
