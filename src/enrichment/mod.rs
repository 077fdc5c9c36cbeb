/// Enrichment provider trait and supporting types
///
/// Provides a pluggable interface for model-backed keyword and named
/// entity extraction from memory content. Supports Ollama (local,
/// default, no API key) and OpenAI API.

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on keywords kept from a provider response.
pub const MAX_KEYWORDS: usize = 10;

/// Errors that can occur during enrichment operations.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Enrichment generation failure (inference error or parse error)
    #[error("Enrichment generation error: {0}")]
    Generation(String),

    /// API provider returned an HTTP error
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Provider not configured (e.g., missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A named entity found in content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Surface text as it appears in the content
    pub text: String,
    /// Entity label: PERSON, ORG, PRODUCT, or GPE
    pub label: String,
}

/// Keywords and entities extracted from one piece of content.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    /// Salient keywords, most important first, lowercased
    pub keywords: Vec<String>,
    /// Named entities with their labels
    pub entities: Vec<NamedEntity>,
}

/// Build the enrichment prompt for a given content string.
pub fn build_enrichment_prompt(content: &str) -> String {
    format!(
        "Extract search keywords and named entities from the following text.\n\
         Keywords: up to 10 single words or short phrases capturing the main \
         topics, lowercased, most salient first.\n\
         Entities: proper nouns, each labeled PERSON, ORG, PRODUCT, or GPE \
         (geopolitical entity).\n\
         Output only JSON matching the provided schema.\n\n\
         Text:\n{}",
        content
    )
}

/// Core trait for extracting keywords and entities from text.
///
/// Implementations must be Send + Sync to support use in async contexts
/// and across thread boundaries (e.g., Arc<dyn EnrichmentProvider>).
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Extract keywords and entities from the given content.
    async fn enrich(&self, content: &str) -> Result<Enrichment, EnrichmentError>;

    /// Return the model name identifier used by this provider.
    fn model_name(&self) -> &str;
}
