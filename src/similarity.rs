/// Similarity scoring between two texts
///
/// Single seam for every caller that compares content: the analyze
/// endpoint, memory ranking, duplicate detection, and grouping all go
/// through a SimilarityEstimator. Two strategies ship: embedding cosine
/// (semantic, model-backed) and lexical token overlap (no models).

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::embedding::EmbeddingProvider;

// ---- Pure scoring functions ----

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when the vectors differ in length or either has zero
/// magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Jaccard similarity over lowercased whitespace tokens.
///
/// Returns 0.0 when either side has no tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let set_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let set_b: HashSet<&str> = b_lower.split_whitespace().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

// ---- Strategy seam ----

/// Strategy for scoring how similar two texts are.
///
/// Implementations absorb their own failures: a provider error logs a
/// warning and scores 0.0 instead of failing the whole request.
#[async_trait]
pub trait SimilarityEstimator: Send + Sync {
    /// Score similarity between two texts. Empty input scores 0.0.
    async fn score(&self, a: &str, b: &str) -> f64;

    /// Strategy identifier for health reporting (e.g., "lexical").
    fn name(&self) -> &str;
}

/// Semantic similarity: embed both texts, compare with cosine.
pub struct EmbeddingSimilarity {
    provider: Arc<dyn EmbeddingProvider>,
    name: String,
}

impl EmbeddingSimilarity {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let name = format!("embedding:{}", provider.model_name());
        EmbeddingSimilarity { provider, name }
    }
}

#[async_trait]
impl SimilarityEstimator for EmbeddingSimilarity {
    async fn score(&self, a: &str, b: &str) -> f64 {
        // Skip the model entirely for blank input
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }

        match tokio::try_join!(self.provider.embed(a), self.provider.embed(b)) {
            Ok((va, vb)) => cosine_similarity(&va, &vb),
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed during similarity scoring, scoring 0.0");
                0.0
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Lexical similarity: token-set overlap. No models, no network.
pub struct LexicalSimilarity;

#[async_trait]
impl SimilarityEstimator for LexicalSimilarity {
    async fn score(&self, a: &str, b: &str) -> f64 {
        jaccard_similarity(a, b)
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingError;

    struct FixedProvider {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(self.vector.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Generation("inference exploded".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.5];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_jaccard_identical_text() {
        assert_eq!(jaccard_similarity("rust is fast", "rust is fast"), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint_text() {
        assert_eq!(jaccard_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // {the, quick, brown, fox} vs {the, lazy, brown, dog}: 2 shared of 6 total
        let sim = jaccard_similarity("the quick brown fox", "the lazy brown dog");
        assert!((sim - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_case_insensitive() {
        assert_eq!(jaccard_similarity("Rust Code", "rust code"), 1.0);
    }

    #[test]
    fn test_jaccard_symmetric() {
        let a = "the quick brown fox";
        let b = "the lazy dog";
        assert_eq!(jaccard_similarity(a, b), jaccard_similarity(b, a));
    }

    #[test]
    fn test_jaccard_empty_side() {
        assert_eq!(jaccard_similarity("", "something"), 0.0);
        assert_eq!(jaccard_similarity("something", "   "), 0.0);
    }

    #[test]
    fn test_jaccard_repeated_tokens_count_once() {
        assert_eq!(jaccard_similarity("go go go", "go"), 1.0);
    }

    #[tokio::test]
    async fn test_lexical_estimator_empty_input() {
        let estimator = LexicalSimilarity;
        assert_eq!(estimator.score("", "content").await, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_estimator_identical_vectors() {
        let estimator = EmbeddingSimilarity::new(Arc::new(FixedProvider {
            vector: vec![0.1, 0.2, 0.3],
        }));
        let sim = estimator.score("one text", "another text").await;
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_embedding_estimator_skips_model_for_blank_input() {
        let estimator = EmbeddingSimilarity::new(Arc::new(FailingProvider));
        // Blank input short-circuits before the provider can fail
        assert_eq!(estimator.score("  ", "content").await, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_estimator_scores_zero_on_provider_error() {
        let estimator = EmbeddingSimilarity::new(Arc::new(FailingProvider));
        assert_eq!(estimator.score("one", "two").await, 0.0);
    }

    #[tokio::test]
    async fn test_estimator_names() {
        let lexical = LexicalSimilarity;
        assert_eq!(lexical.name(), "lexical");

        let embedding = EmbeddingSimilarity::new(Arc::new(FixedProvider { vector: vec![1.0] }));
        assert_eq!(embedding.name(), "embedding:fixed");
    }
}
