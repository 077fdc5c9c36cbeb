/// OpenAI summary provider
///
/// Calls the OpenAI Chat Completions API using reqwest.
/// Requires MEMSIFT_SUMMARIZATION__OPENAI_API_KEY env var or openai_api_key in config.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_summary_prompt, SummaryError, SummaryProvider};
use crate::analysis::patterns::truncate_chars;

/// Request body for OpenAI Chat Completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
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

/// OpenAI-backed summary provider.
///
/// Requires a valid API key, validated on construction rather than at
/// summarize time.
pub struct OpenAISummaryProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_content_chars: usize,
}

impl OpenAISummaryProvider {
    /// Create a new OpenAISummaryProvider.
    ///
    /// # Errors
    /// Returns `SummaryError::NotConfigured` if api_key is empty.
    pub fn new(
        api_key: String,
        model: String,
        max_content_chars: usize,
    ) -> Result<Self, SummaryError> {
        if api_key.trim().is_empty() {
            return Err(SummaryError::NotConfigured(
                "OpenAI API key is required when using the openai summary provider. \
                 Set MEMSIFT_SUMMARIZATION__OPENAI_API_KEY or openai_api_key in memsift.toml"
                    .to_string(),
            ));
        }

        Ok(OpenAISummaryProvider {
            client: reqwest::Client::new(),
            api_key,
            model,
            max_content_chars,
        })
    }
}

#[async_trait]
impl SummaryProvider for OpenAISummaryProvider {
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

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_summary_prompt(truncated_text, max_chars),
            }],
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Generation(format!("Failed to parse API response: {}", e)))?;

        let summary = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SummaryError::Generation("API returned no choices".to_string()))?;

        let summary = summary.trim().to_string();
        if summary.is_empty() {
            return Err(SummaryError::Generation("Empty summary response".to_string()));
        }

        Ok(summary)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
