/// HTTP surface: axum router, request/response DTOs, and handlers.
///
/// Every endpoint takes JSON and returns JSON. Validation failures map
/// to 400 with the offending field named; anything else that goes wrong
/// maps to 500 with the message carried verbatim (the server only ever
/// binds locally, so leaking messages to the caller is acceptable).

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::classify::{self, CategoryResult};
use crate::analysis::{gate, patterns};
use crate::engine::{AnalysisEngine, ComponentStatus, ProcessOutcome};
use crate::errors::MemsiftError;
use crate::search::{MemoryRecord, ScoredMemory, DEFAULT_SEARCH_LIMIT};
use crate::summarization::DEFAULT_SUMMARY_CHARS;

/// Two contents scoring above this are reported as similar.
const SIMILAR_THRESHOLD: f64 = 0.8;

/// Shared state behind every handler.
pub struct AppState {
    pub engine: AnalysisEngine,
    start_time: Instant,
}

impl AppState {
    pub fn new(engine: AnalysisEngine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Build the router. Middleware layers (CORS, request tracing) are
/// applied by the caller.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/process-content", post(process_content))
        .route("/api/categorize", post(categorize))
        .route("/api/summarize", post(summarize))
        .route("/api/extract-tags", post(extract_tags))
        .route("/api/analyze-similarity", post(analyze_similarity))
        .route("/api/search-memories", post(search_memories))
        .route("/api/extract-facts", post(extract_facts))
        .route("/api/is-worth-saving", post(is_worth_saving))
        .with_state(state)
}

impl IntoResponse for MemsiftError {
    fn into_response(self) -> Response {
        match self {
            MemsiftError::Validation { message, field } => {
                let body = json!({ "error": message, "field": field });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                let body = json!({ "error": other.to_string() });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

// Request DTOs

#[derive(Debug, Deserialize)]
struct ContentRequest {
    /// Text to analyze (required)
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    /// Text to summarize (required)
    #[serde(default)]
    content: String,
    /// Summary budget in characters (default: 150)
    #[serde(default = "default_max_length")]
    max_length: usize,
}

fn default_max_length() -> usize {
    DEFAULT_SUMMARY_CHARS
}

#[derive(Debug, Deserialize)]
struct SimilarityRequest {
    /// First text (required)
    #[serde(default)]
    content1: String,
    /// Second text (required)
    #[serde(default)]
    content2: String,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    /// Search query (required)
    #[serde(default)]
    query: String,
    /// Candidate memories to rank (required, non-empty)
    #[serde(default)]
    memories: Vec<MemoryRecord>,
    /// Maximum results to return (default: 5)
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

// Response DTOs

#[derive(Debug, Serialize)]
struct SummarizeResponse {
    summary: String,
    /// Char count of the input
    original_length: usize,
    /// Char count of the summary
    summary_length: usize,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    tags: Vec<String>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct FactsResponse {
    facts: Vec<String>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct WorthSavingResponse {
    worth_saving: bool,
    reason: String,
}

#[derive(Debug, Serialize)]
struct SimilarityResponse {
    similarity_score: f64,
    is_similar: bool,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<ScoredMemory>,
    query: String,
    total_memories: usize,
    results_count: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_seconds: u64,
    profile: String,
    components: ComponentStatus,
}

fn require_content(content: &str) -> Result<(), MemsiftError> {
    if content.is_empty() {
        return Err(MemsiftError::validation("content", "No content provided"));
    }
    Ok(())
}

// Handlers

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        profile: state.engine.profile().to_string(),
        components: state.engine.components(),
    })
}

async fn process_content(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<ProcessOutcome>, MemsiftError> {
    require_content(&request.content)?;
    let outcome = state.engine.process_content(&request.content).await;
    Ok(Json(outcome))
}

async fn categorize(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<CategoryResult>, MemsiftError> {
    require_content(&request.content)?;
    Ok(Json(classify::classify(&request.content)))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, MemsiftError> {
    require_content(&request.content)?;
    let original_length = request.content.chars().count();
    let summary = state
        .engine
        .summarize(&request.content, request.max_length)
        .await;
    Ok(Json(SummarizeResponse {
        original_length,
        summary_length: summary.chars().count(),
        summary,
    }))
}

async fn extract_tags(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<TagsResponse>, MemsiftError> {
    require_content(&request.content)?;
    let tags = state.engine.extract_tags(&request.content).await;
    Ok(Json(TagsResponse {
        count: tags.len(),
        tags,
    }))
}

async fn analyze_similarity(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, MemsiftError> {
    if request.content1.is_empty() {
        return Err(MemsiftError::validation(
            "content1",
            "Both content1 and content2 are required",
        ));
    }
    if request.content2.is_empty() {
        return Err(MemsiftError::validation(
            "content2",
            "Both content1 and content2 are required",
        ));
    }
    let similarity_score = state
        .engine
        .similarity_score(&request.content1, &request.content2)
        .await;
    Ok(Json(SimilarityResponse {
        similarity_score,
        is_similar: similarity_score > SIMILAR_THRESHOLD,
    }))
}

async fn search_memories(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, MemsiftError> {
    if request.query.is_empty() {
        return Err(MemsiftError::validation("query", "No query provided"));
    }
    if request.memories.is_empty() {
        return Err(MemsiftError::validation(
            "memories",
            "No memories provided",
        ));
    }
    let total_memories = request.memories.len();
    let results = state
        .engine
        .ranker()
        .rank(&request.query, request.memories, request.limit)
        .await;
    Ok(Json(SearchResponse {
        results_count: results.len(),
        results,
        query: request.query,
        total_memories,
    }))
}

async fn extract_facts(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<FactsResponse>, MemsiftError> {
    require_content(&request.content)?;
    let facts = patterns::extract_facts(&request.content);
    Ok(Json(FactsResponse {
        count: facts.len(),
        facts,
    }))
}

async fn is_worth_saving(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<WorthSavingResponse>, MemsiftError> {
    require_content(&request.content)?;
    let worth_saving = gate::is_worth_saving(&request.content);
    let reason = if worth_saving {
        gate::save_reason(&request.content)
    } else {
        gate::NOT_SUBSTANTIAL_REASON.to_string()
    };
    Ok(Json(WorthSavingResponse {
        worth_saving,
        reason,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let response =
            MemsiftError::validation("content", "No content provided").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_error_maps_to_internal_server_error() {
        let response = MemsiftError::Provider("model offline".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_require_content_rejects_empty() {
        assert!(require_content("").is_err());
        assert!(require_content("hello").is_ok());
    }
}
