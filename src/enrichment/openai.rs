/// OpenAI enrichment provider
///
/// Calls the OpenAI Chat Completions API with JSON response format.
/// Requires MEMSIFT_ENRICHMENT__OPENAI_API_KEY env var or openai_api_key in config.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_enrichment_prompt, Enrichment, EnrichmentError, EnrichmentProvider, NamedEntity};
use crate::analysis::patterns::truncate_chars;

/// Request body for OpenAI Chat Completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Forces the model to emit valid JSON
#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Response from OpenAI Chat Completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
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

/// OpenAI-backed enrichment provider.
///
/// Requires a valid API key, validated on construction rather than at
/// enrich time.
pub struct OpenAIEnrichmentProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_content_chars: usize,
}

impl OpenAIEnrichmentProvider {
    /// Create a new OpenAIEnrichmentProvider.
    ///
    /// # Errors
    /// Returns `EnrichmentError::NotConfigured` if api_key is empty.
    pub fn new(
        api_key: String,
        model: String,
        max_content_chars: usize,
    ) -> Result<Self, EnrichmentError> {
        if api_key.trim().is_empty() {
            return Err(EnrichmentError::NotConfigured(
                "OpenAI API key is required when using the openai enrichment provider. \
                 Set MEMSIFT_ENRICHMENT__OPENAI_API_KEY or openai_api_key in memsift.toml"
                    .to_string(),
            ));
        }

        Ok(OpenAIEnrichmentProvider {
            client: reqwest::Client::new(),
            api_key,
            model,
            max_content_chars,
        })
    }
}

#[async_trait]
impl EnrichmentProvider for OpenAIEnrichmentProvider {
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

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_enrichment_prompt(truncated_content),
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Generation(format!("Failed to parse API response: {}", e)))?;

        let content_json = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EnrichmentError::Generation("API returned no choices".to_string()))?;

        let output: EnrichmentOutput = serde_json::from_str(&content_json).map_err(|e| {
            EnrichmentError::Generation(format!(
                "Failed to parse enrichment JSON from model output: {} (content: {})",
                e, content_json
            ))
        })?;

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
