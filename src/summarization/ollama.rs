/// Ollama summary provider
///
/// Calls the Ollama /api/chat endpoint for free-form text generation.
/// No format schema (unlike enrichment); summaries are plain prose.
/// Uses llama3.2:3b by default, no API key required for self-hosted deployments.
/// Supports MEMSIFT_SUMMARIZATION__OLLAMA_MODEL and MEMSIFT_SUMMARIZATION__OLLAMA_BASE_URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_summary_prompt, SummaryError, SummaryProvider};
use crate::analysis::patterns::truncate_chars;

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
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

/// Ollama-backed summary provider.
///
/// Truncates content to max_content_chars to avoid context overflow.
pub struct OllamaSummaryProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_content_chars: usize,
}

impl OllamaSummaryProvider {
    /// Create a new OllamaSummaryProvider.
    ///
    /// # Arguments
    /// * `base_url` - Ollama server base URL (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "llama3.2:3b")
    /// * `max_content_chars` - Maximum content length before truncation
    pub fn new(base_url: String, model: String, max_content_chars: usize) -> Self {
        OllamaSummaryProvider {
            client: reqwest::Client::new(),
            base_url,
            model,
            max_content_chars,
        }
    }
}

#[async_trait]
impl SummaryProvider for OllamaSummaryProvider {
    async fn summarize(&self, text: &str, max_chars: usize) -> Result<String, SummaryError> {
        // Truncate content if too long
        let char_count = text.chars().count();
        let truncated_text = if char_count > self.max_content_chars {
            tracing::warn!(
                original_chars = char_count,
                truncated_to = self.max_content_chars,
                "Content truncated for summarization"
            );
            truncate_chars(text, self.max_content_chars)
        } else {
            text
        };

        let prompt = build_summary_prompt(truncated_text, max_chars);

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
            options: OllamaOptions { temperature: 0.2 },
        };

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummaryError::Generation(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SummaryError::Api { status, message: body });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Generation(format!("Failed to parse Ollama response: {}", e)))?;

        let summary = chat_response.message.content.trim().to_string();
        if summary.is_empty() {
            return Err(SummaryError::Generation("Empty summary response".to_string()));
        }

        Ok(summary)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
