/// Domain-specific error types for memsift
///
/// Provides actionable error messages with enough context for API
/// clients (browser extensions, agents) to correct bad requests.

#[derive(Debug, thiserror::Error)]
pub enum MemsiftError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::embedding::EmbeddingError> for MemsiftError {
    fn from(e: crate::embedding::EmbeddingError) -> Self {
        MemsiftError::Provider(e.to_string())
    }
}

impl From<crate::summarization::SummaryError> for MemsiftError {
    fn from(e: crate::summarization::SummaryError) -> Self {
        MemsiftError::Provider(e.to_string())
    }
}

impl From<crate::enrichment::EnrichmentError> for MemsiftError {
    fn from(e: crate::enrichment::EnrichmentError) -> Self {
        MemsiftError::Provider(e.to_string())
    }
}

impl MemsiftError {
    /// Helper to create validation errors with field names
    ///
    /// Example:
    /// ```
    /// use memsift::errors::MemsiftError;
    /// let err = MemsiftError::validation("content", "Content cannot be empty");
    /// ```
    pub fn validation(field: &str, message: &str) -> Self {
        MemsiftError::Validation {
            message: message.to_string(),
            field: Some(field.to_string()),
        }
    }
}
