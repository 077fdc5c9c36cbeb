/// Analysis engine assembly.
///
/// One `AnalysisEngine` is built at startup from config and shared
/// through the axum state. It owns the similarity estimator, the
/// summarizer, the optional enrichment provider, and the memory ranker,
/// and exposes the composite process-content pipeline on top of them.
/// Every method degrades instead of failing: a provider error yields the
/// pattern-based result for that field and the request still succeeds.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::analysis::classify::{self, CategoryResult};
use crate::analysis::gate;
use crate::analysis::patterns::{self, CodeBlock};
use crate::analysis::signals::{self, ComplexityResult, SentimentResult};
use crate::analysis::tags;
use crate::config::RankingConfig;
use crate::enrichment::{Enrichment, EnrichmentProvider, NamedEntity, MAX_KEYWORDS};
use crate::search::MemoryRanker;
use crate::similarity::SimilarityEstimator;
use crate::summarization::{Summarizer, DEFAULT_SUMMARY_CHARS};

/// Keywords taken from the pattern fallback when no provider is wired.
const FALLBACK_KEYWORDS: usize = 5;

/// Active strategy name per sub-component, for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    pub similarity: String,
    pub summarizer: String,
    pub enrichment: String,
}

/// Everything the composite pipeline derives from one piece of content.
#[derive(Debug, Serialize)]
pub struct ProcessedContent {
    pub worth_saving: bool,
    /// Full classification: winning label, confidence, per-category scores
    pub category: CategoryResult,
    pub summary: String,
    pub tags: Vec<String>,
    pub facts: Vec<String>,
    pub entities: Vec<NamedEntity>,
    pub keywords: Vec<String>,
    pub technical_terms: Vec<String>,
    pub code_blocks: Vec<CodeBlock>,
    pub urls: Vec<String>,
    pub complexity: ComplexityResult,
    pub sentiment: SentimentResult,
    pub language: String,
    /// Wall-clock pipeline duration in seconds
    pub processing_time: f64,
}

/// Outcome of the composite pipeline. Content that fails the
/// worth-saving gate is skipped before any model call.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProcessOutcome {
    Skipped { worth_saving: bool, reason: String },
    Processed(Box<ProcessedContent>),
}

/// Conversational signals for a piece of captured text.
#[derive(Debug, Serialize)]
pub struct ConversationContext {
    pub has_question: bool,
    pub has_answer: bool,
    /// First enriched keyword, or "general" when there is none
    pub topic: String,
    pub entities: Vec<NamedEntity>,
    pub technical_terms: Vec<String>,
    pub code_blocks: Vec<CodeBlock>,
    pub urls: Vec<String>,
}

pub struct AnalysisEngine {
    similarity: Arc<dyn SimilarityEstimator>,
    summarizer: Summarizer,
    enrichment: Option<Arc<dyn EnrichmentProvider>>,
    ranker: MemoryRanker,
    profile: String,
}

impl AnalysisEngine {
    pub fn new(
        similarity: Arc<dyn SimilarityEstimator>,
        summarizer: Summarizer,
        enrichment: Option<Arc<dyn EnrichmentProvider>>,
        ranking: &RankingConfig,
        profile: impl Into<String>,
    ) -> Self {
        let ranker = MemoryRanker::new(Arc::clone(&similarity), ranking);
        AnalysisEngine {
            similarity,
            summarizer,
            enrichment,
            ranker,
            profile: profile.into(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn ranker(&self) -> &MemoryRanker {
        &self.ranker
    }

    /// What actually initialized, after any startup degradation.
    pub fn components(&self) -> ComponentStatus {
        ComponentStatus {
            similarity: self.similarity.name().to_string(),
            summarizer: self
                .summarizer
                .provider_name()
                .unwrap_or("extractive")
                .to_string(),
            enrichment: self
                .enrichment
                .as_deref()
                .map(|p| p.model_name())
                .unwrap_or("patterns")
                .to_string(),
        }
    }

    pub async fn similarity_score(&self, a: &str, b: &str) -> f64 {
        self.similarity.score(a, b).await
    }

    pub async fn summarize(&self, content: &str, max_length: usize) -> String {
        self.summarizer.summarize(content, max_length).await
    }

    /// Model-backed keywords and entities. Any provider failure falls
    /// back to pattern keywords and no entities.
    pub async fn enrich(&self, content: &str) -> Enrichment {
        match &self.enrichment {
            Some(provider) => match provider.enrich(content).await {
                Ok(mut enrichment) => {
                    enrichment.keywords.truncate(MAX_KEYWORDS);
                    enrichment
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Enrichment failed, using pattern keywords");
                    Self::fallback_enrichment(content)
                }
            },
            None => Self::fallback_enrichment(content),
        }
    }

    fn fallback_enrichment(content: &str) -> Enrichment {
        Enrichment {
            keywords: patterns::lexical_keywords(content, FALLBACK_KEYWORDS),
            entities: Vec::new(),
        }
    }

    /// Hashtags, technical terms, enriched keywords, and entity names,
    /// deduplicated and bounded.
    pub async fn extract_tags(&self, content: &str) -> Vec<String> {
        let enrichment = self.enrich(content).await;
        tags::assemble_tags(content, &enrichment)
    }

    /// Run the full pipeline over one piece of content.
    ///
    /// Gate first: content that is not worth saving short-circuits
    /// before any model call.
    pub async fn process_content(&self, content: &str) -> ProcessOutcome {
        let started = Instant::now();

        if !gate::is_worth_saving(content) {
            return ProcessOutcome::Skipped {
                worth_saving: false,
                reason: gate::NOT_SUBSTANTIAL_REASON.to_string(),
            };
        }

        let category = classify::classify(content);
        let summary = self.summarize(content, DEFAULT_SUMMARY_CHARS).await;
        let enrichment = self.enrich(content).await;
        let tags = tags::assemble_tags(content, &enrichment);

        ProcessOutcome::Processed(Box::new(ProcessedContent {
            worth_saving: true,
            category,
            summary,
            tags,
            facts: patterns::extract_facts(content),
            entities: enrichment.entities,
            keywords: enrichment.keywords,
            technical_terms: patterns::technical_terms(content),
            code_blocks: patterns::extract_code_blocks(content),
            urls: patterns::extract_urls(content),
            complexity: signals::complexity(content),
            sentiment: signals::sentiment(content),
            language: signals::detect_language(content),
            processing_time: started.elapsed().as_secs_f64(),
        }))
    }

    /// Conversational signals plus the structural extractions.
    pub async fn conversation_context(&self, content: &str) -> ConversationContext {
        let enrichment = self.enrich(content).await;
        let topic = enrichment
            .keywords
            .first()
            .cloned()
            .unwrap_or_else(|| "general".to_string());

        ConversationContext {
            has_question: signals::has_question(content),
            has_answer: signals::has_answer(content),
            topic,
            entities: enrichment.entities,
            technical_terms: patterns::technical_terms(content),
            code_blocks: patterns::extract_code_blocks(content),
            urls: patterns::extract_urls(content),
        }
    }
}
