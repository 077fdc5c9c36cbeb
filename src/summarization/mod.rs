/// Summary provider trait and orchestration
///
/// Provides a pluggable interface for abstractive summarization of memory
/// content, with Ollama (local, default, no API key) and OpenAI backends,
/// plus the deterministic extractive fallback used when no model is
/// available or the model call fails.

pub mod extractive;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::analysis::patterns::truncate_chars;

/// Summary budget (chars) when the caller does not supply one.
pub const DEFAULT_SUMMARY_CHARS: usize = 150;

/// Errors that can occur during summary generation.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Summary generation failure (inference error or empty output)
    #[error("Summary generation error: {0}")]
    Generation(String),

    /// API provider returned an HTTP error
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Provider not configured (e.g., missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Build the summarization prompt for a given text and length budget.
pub fn build_summary_prompt(text: &str, max_chars: usize) -> String {
    format!(
        "Summarize the following text in at most {} characters. \
         Keep the key facts and drop filler. \
         Respond with the summary text only, no preamble.\n\n\
         Text:\n{}",
        max_chars, text
    )
}

/// Core trait for abstractive summarization.
///
/// Implementations must be Send + Sync to support use in async contexts
/// and across thread boundaries (e.g., Arc<dyn SummaryProvider>).
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Summarize the given text to roughly max_chars characters.
    ///
    /// The budget is advisory to the model; callers clamp the output.
    async fn summarize(&self, text: &str, max_chars: usize) -> Result<String, SummaryError>;

    /// Return the model name identifier used by this provider.
    fn model_name(&self) -> &str;
}

/// Summarization front door: abstractive model when wired, extractive
/// fallback on any failure, passthrough for short input.
///
/// summarize() never fails. A provider error is logged and absorbed.
pub struct Summarizer {
    provider: Option<Arc<dyn SummaryProvider>>,
}

impl Summarizer {
    pub fn new(provider: Option<Arc<dyn SummaryProvider>>) -> Self {
        Summarizer { provider }
    }

    /// True when an abstractive provider is wired in.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Model name of the wired provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model_name())
    }

    /// Summarize text to at most max_length characters.
    ///
    /// Input shorter than MIN_SUMMARY_INPUT_CHARS comes back unchanged,
    /// regardless of max_length. Abstractive output is clamped to the
    /// budget since models treat it as advisory.
    pub async fn summarize(&self, text: &str, max_length: usize) -> String {
        if text.chars().count() < extractive::MIN_SUMMARY_INPUT_CHARS {
            return text.to_string();
        }

        if let Some(provider) = &self.provider {
            match provider.summarize(text, max_length).await {
                Ok(summary) => {
                    return truncate_chars(&summary, max_length).to_string();
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Abstractive summarization failed, falling back to extractive"
                    );
                }
            }
        }

        extractive::extractive_summary(text, max_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSummary(String);

    #[async_trait]
    impl SummaryProvider for FixedSummary {
        async fn summarize(&self, _text: &str, _max_chars: usize) -> Result<String, SummaryError> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingSummary;

    #[async_trait]
    impl SummaryProvider for FailingSummary {
        async fn summarize(&self, _text: &str, _max_chars: usize) -> Result<String, SummaryError> {
            Err(SummaryError::Generation("model unavailable".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    const LONG_TEXT: &str = "Rust compiles fast. The weather is nice today outside. \
                             Rust tooling is great for large projects. Lunch was okay I suppose.";

    #[tokio::test]
    async fn test_short_input_passes_through_unchanged() {
        let summarizer = Summarizer::new(None);
        let text = "Short note.";
        assert_eq!(summarizer.summarize(text, 5).await, text);
    }

    #[tokio::test]
    async fn test_no_provider_uses_extractive() {
        let summarizer = Summarizer::new(None);
        let summary = summarizer.summarize(LONG_TEXT, 80).await;
        assert_eq!(summary, extractive::extractive_summary(LONG_TEXT, 80));
    }

    #[tokio::test]
    async fn test_provider_output_is_clamped_to_budget() {
        let summarizer = Summarizer::new(Some(Arc::new(FixedSummary("x".repeat(500)))));
        let summary = summarizer.summarize(LONG_TEXT, 150).await;
        assert_eq!(summary.chars().count(), 150);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_extractive() {
        let summarizer = Summarizer::new(Some(Arc::new(FailingSummary)));
        let summary = summarizer.summarize(LONG_TEXT, 80).await;
        assert_eq!(summary, extractive::extractive_summary(LONG_TEXT, 80));
    }

    #[tokio::test]
    async fn test_provider_name_reporting() {
        let with_provider = Summarizer::new(Some(Arc::new(FixedSummary("s".to_string()))));
        assert!(with_provider.has_provider());
        assert_eq!(with_provider.provider_name(), Some("fixed"));

        let without = Summarizer::new(None);
        assert!(!without.has_provider());
        assert_eq!(without.provider_name(), None);
    }
}
