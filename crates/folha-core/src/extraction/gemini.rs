//! Google Gemini extraction client.
//!
//! Sends one `generateContent` request per document with the PDF attached as
//! inline base64 data, the extraction policy as system instruction and a JSON
//! response schema. No retries and no local timeout: a failed call fails the
//! document.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use super::prompt::{SYSTEM_INSTRUCTION, TASK_INSTRUCTION};
use super::schema::response_schema;
use super::{parse_records, PayrollExtractor};
use crate::error::{FolhaError, Result};
use crate::models::config::ProviderConfig;
use crate::models::document::Document;
use crate::models::payroll::PayrollRecord;

/// Message used when no API key was configured.
pub const MISSING_API_KEY: &str = "Chave de API do Gemini não configurada. \
Defina GEMINI_API_KEY ou provider.api_key no arquivo de configuração.";

/// Gemini payroll extractor.
pub struct GeminiExtractor {
    config: ProviderConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiExtractor {
    /// Create a new extractor from provider settings.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| FolhaError::Provider(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the provider settings.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    pub(crate) fn build_request(document: &Document) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: document.media_type.clone(),
                            data: document.to_base64(),
                        },
                    },
                    Part::Text {
                        text: TASK_INSTRUCTION.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all its parts joined.
    pub(crate) fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(FolhaError::Provider(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("Gemini blocked the prompt: {}", reason);
        }

        let text = self
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

#[async_trait]
impl PayrollExtractor for GeminiExtractor {
    async fn extract(&self, document: &Document) -> Result<Vec<PayrollRecord>> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| FolhaError::Config(MISSING_API_KEY.to_string()))?;

        let start = Instant::now();
        let request = Self::build_request(document);

        debug!(
            "Sending {} ({} bytes) to {}",
            document.name,
            document.data.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FolhaError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FolhaError::Provider(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FolhaError::ResponseShape(format!("failed to parse response: {}", e)))?;

        let records = parse_records(&body.into_text()?)?;

        debug!(
            "Extracted {} records from {} in {}ms",
            records.len(),
            document.name,
            start.elapsed().as_millis()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::PDF_MEDIA_TYPE;
    use crate::models::payroll::FIELD_COUNT;
    use pretty_assertions::assert_eq;

    fn document() -> Document {
        Document::new("folha.pdf", PDF_MEDIA_TYPE, b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_request_body_layout() {
        let request = GeminiExtractor::build_request(&document());
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], PDF_MEDIA_TYPE);
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0xLjQ=");
        assert_eq!(parts[1]["text"], TASK_INSTRUCTION);

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["items"]["required"]
                .as_array()
                .unwrap()
                .len(),
            FIELD_COUNT
        );
    }

    #[test]
    fn test_url_from_config() {
        let config = ProviderConfig::default()
            .with_endpoint("http://localhost:8080/v1beta/")
            .with_model("gemini-test");
        let extractor = GeminiExtractor::new(config).unwrap();
        assert_eq!(
            extractor.url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "[{\"id\": "}, {"text": "\"1\"}]"}]}}]}"#,
        )
        .unwrap();
        let text = response.into_text().unwrap();
        let records = parse_records(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "OTHER"}}"#).unwrap();
        assert_eq!(response.into_text().unwrap(), "");
    }

    #[test]
    fn test_response_error_is_provider_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"error": {"message": "API key not valid"}}"#).unwrap();
        assert!(matches!(
            response.into_text().unwrap_err(),
            FolhaError::Provider(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        // Port 9 (discard) on localhost: a request would fail as a provider
        // error, so a config error proves no request was attempted.
        let config = ProviderConfig::default().with_endpoint("http://127.0.0.1:9");
        let extractor = GeminiExtractor::new(config).unwrap();

        let err = extractor.extract(&document()).await.unwrap_err();
        match err {
            FolhaError::Config(msg) => assert_eq!(msg, MISSING_API_KEY),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
