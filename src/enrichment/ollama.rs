/// Ollama enrichment provider
///
/// Calls the Ollama /api/chat endpoint with structured JSON output schema.
/// Uses llama3.2:3b by default, no API key required for self-hosted deployments.
/// Supports MEMSIFT_ENRICHMENT__OLLAMA_MODEL and MEMSIFT_ENRICHMENT__OLLAMA_BASE_URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{build_enrichment_prompt, Enrichment, EnrichmentError, EnrichmentProvider, NamedEntity};
use crate::analysis::patterns::truncate_chars;

/// Request body for Ollama /api/chat with structured output
#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
    format: serde_json::Value,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama /api/chat
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

/// Parsed enrichment result from model output
#[derive(Deserialize)]
struct EnrichmentOutput {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    entities: Vec<EntityOutput>,
}

#[derive(Deserialize)]
struct EntityOutput {
    text: String,
    label: String,
}

/// Ollama-backed enrichment provider.
///
/// Uses the /api/chat endpoint with structured JSON output (format field).
/// Truncates content to max_content_chars to avoid context overflow.
pub struct OllamaEnrichmentProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_content_chars: usize,
}

impl OllamaEnrichmentProvider {
    /// Create a new OllamaEnrichmentProvider.
    ///
    /// # Arguments
    /// * `base_url` - Ollama server base URL (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "llama3.2:3b")
    /// * `max_content_chars` - Maximum content length before truncation
    pub fn new(base_url: String, model: String, max_content_chars: usize) -> Self {
        OllamaEnrichmentProvider {
            client: reqwest::Client::new(),
            base_url,
            model,
            max_content_chars,
        }
    }
}

/// JSON schema for structured enrichment output
fn enrichment_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "keywords": {
                "type": "array",
                "items": {"type": "string"}
            },
            "entities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "label": {"type": "string"}
                    },
                    "required": ["text", "label"]
                }
            }
        },
        "required": ["keywords", "entities"]
    })
}

#[async_trait]
impl EnrichmentProvider for OllamaEnrichmentProvider {
    async fn enrich(&self, content: &str) -> Result<Enrichment, EnrichmentError> {
        // Truncate content if too long
        let char_count = content.chars().count();
        let truncated_content = if char_count > self.max_content_chars {
            tracing::warn!(
                original_chars = char_count,
                truncated_to = self.max_content_chars,
                "Content truncated for enrichment"
            );
            truncate_chars(content, self.max_content_chars)
        } else {
            content
        };

        let prompt = build_enrichment_prompt(truncated_content);

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
            options: OllamaOptions { temperature: 0.0 },
            format: enrichment_schema(),
        };

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Generation(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(EnrichmentError::Api { status, message: body });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Generation(format!("Failed to parse Ollama response: {}", e)))?;

        // The content field is a JSON string, parse it into EnrichmentOutput
        let output: EnrichmentOutput = serde_json::from_str(&chat_response.message.content)
            .map_err(|e| EnrichmentError::Generation(format!(
                "Failed to parse enrichment JSON from model output: {} (content: {})",
                e, &chat_response.message.content
            )))?;

        Ok(Enrichment {
            keywords: output.keywords,
            entities: output
                .entities
                .into_iter()
                .map(|e| NamedEntity {
                    text: e.text,
                    label: e.label,
                })
                .collect(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
