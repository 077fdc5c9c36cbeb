use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use memsift::config::Config;
use memsift::embedding::local::LocalEmbeddingProvider;
use memsift::embedding::openai::OpenAIEmbeddingProvider;
use memsift::embedding::EmbeddingProvider;
use memsift::engine::AnalysisEngine;
use memsift::enrichment::ollama::OllamaEnrichmentProvider;
use memsift::enrichment::openai::OpenAIEnrichmentProvider;
use memsift::enrichment::EnrichmentProvider;
use memsift::logging;
use memsift::server::{create_router, AppState};
use memsift::similarity::{EmbeddingSimilarity, LexicalSimilarity, SimilarityEstimator};
use memsift::summarization::ollama::OllamaSummaryProvider;
use memsift::summarization::openai::OpenAISummaryProvider;
use memsift::summarization::{Summarizer, SummaryProvider};

#[derive(Parser)]
#[command(
    name = "memsift",
    version,
    about = "Local content analysis server for AI memory capture"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bind address override (config default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port override (config default: 5000)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Engine profile override: "full" or "lite"
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration and exit
    CheckConfig,
}

/// Create the embedding provider based on configuration.
async fn create_embedding_provider(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding.provider.as_str() {
        "openai" => {
            let api_key = config.embedding.openai_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "OpenAI API key required when embedding provider is 'openai'. \
                     Set MEMSIFT_EMBEDDING__OPENAI_API_KEY or embedding.openai_api_key in memsift.toml"
                )
            })?;
            Ok(Arc::new(OpenAIEmbeddingProvider::new(
                api_key,
                config.embedding.openai_model.clone(),
            )?))
        }
        "local" | _ => Ok(Arc::new(
            LocalEmbeddingProvider::new(config.embedding.resolve_cache_dir()).await?,
        )),
    }
}

/// Create the similarity estimator for the configured profile.
///
/// The lite profile always uses lexical overlap. The full profile uses
/// embeddings, degrading to lexical if the provider fails to initialize
/// (unless strict mode is on).
async fn create_similarity_estimator(config: &Config) -> Result<Arc<dyn SimilarityEstimator>> {
    if config.profile != "full" {
        return Ok(Arc::new(LexicalSimilarity));
    }
    match create_embedding_provider(config).await {
        Ok(provider) => Ok(Arc::new(EmbeddingSimilarity::new(provider))),
        Err(e) => {
            if config.strict {
                return Err(e);
            }
            tracing::warn!(error = %e, "Embedding provider failed to initialize, using lexical similarity");
            Ok(Arc::new(LexicalSimilarity))
        }
    }
}

fn build_summary_provider(config: &Config) -> Result<Arc<dyn SummaryProvider>> {
    match config.summarization.provider.as_str() {
        "openai" => {
            let api_key = config.summarization.openai_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "OpenAI API key required when summarization provider is 'openai'. \
                     Set MEMSIFT_SUMMARIZATION__OPENAI_API_KEY or summarization.openai_api_key in memsift.toml"
                )
            })?;
            Ok(Arc::new(OpenAISummaryProvider::new(
                api_key,
                config.summarization.openai_model.clone(),
                config.summarization.max_content_chars,
            )?))
        }
        "ollama" | _ => Ok(Arc::new(OllamaSummaryProvider::new(
            config.summarization.ollama_base_url.clone(),
            config.summarization.ollama_model.clone(),
            config.summarization.max_content_chars,
        ))),
    }
}

/// Create the summary provider, or None for the extractive-only path.
fn create_summary_provider(config: &Config) -> Result<Option<Arc<dyn SummaryProvider>>> {
    if config.profile != "full" {
        return Ok(None);
    }
    match build_summary_provider(config) {
        Ok(provider) => Ok(Some(provider)),
        Err(e) => {
            if config.strict {
                return Err(e);
            }
            tracing::warn!(error = %e, "Summarization provider failed to initialize, summaries fall back to extractive");
            Ok(None)
        }
    }
}

fn build_enrichment_provider(config: &Config) -> Result<Arc<dyn EnrichmentProvider>> {
    match config.enrichment.provider.as_str() {
        "openai" => {
            let api_key = config.enrichment.openai_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "OpenAI API key required when enrichment provider is 'openai'. \
                     Set MEMSIFT_ENRICHMENT__OPENAI_API_KEY or enrichment.openai_api_key in memsift.toml"
                )
            })?;
            Ok(Arc::new(OpenAIEnrichmentProvider::new(
                api_key,
                config.enrichment.openai_model.clone(),
                config.enrichment.max_content_chars,
            )?))
        }
        "ollama" | _ => Ok(Arc::new(OllamaEnrichmentProvider::new(
            config.enrichment.ollama_base_url.clone(),
            config.enrichment.ollama_model.clone(),
            config.enrichment.max_content_chars,
        ))),
    }
}

/// Create the enrichment provider, or None for pattern extraction only.
fn create_enrichment_provider(config: &Config) -> Result<Option<Arc<dyn EnrichmentProvider>>> {
    if config.profile != "full" {
        return Ok(None);
    }
    match build_enrichment_provider(config) {
        Ok(provider) => Ok(Some(provider)),
        Err(e) => {
            if config.strict {
                return Err(e);
            }
            tracing::warn!(error = %e, "Enrichment provider failed to initialize, running with pattern extraction only");
            Ok(None)
        }
    }
}

/// Assemble the analysis engine for the configured profile.
async fn build_engine(config: &Config) -> Result<AnalysisEngine> {
    let similarity = create_similarity_estimator(config).await?;
    let summarizer = Summarizer::new(create_summary_provider(config)?);
    let enrichment = create_enrichment_provider(config)?;
    Ok(AnalysisEngine::new(
        similarity,
        summarizer,
        enrichment,
        &config.ranking,
        config.profile.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args
    let cli = Cli::parse();

    // 2. Load configuration and apply CLI overrides
    let mut config = Config::load()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    // Overrides can introduce values load() never saw
    config.validate()?;

    // 3. Initialize logging before any other output
    logging::init_logging(&config);

    // 4. Handle subcommands
    if let Some(Commands::CheckConfig) = cli.command {
        let mut effective = config.clone();
        effective.embedding.openai_api_key =
            effective.embedding.openai_api_key.map(|_| "<redacted>".to_string());
        effective.summarization.openai_api_key =
            effective.summarization.openai_api_key.map(|_| "<redacted>".to_string());
        effective.enrichment.openai_api_key =
            effective.enrichment.openai_api_key.map(|_| "<redacted>".to_string());
        println!("{}", serde_json::to_string_pretty(&effective)?);
        return Ok(());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = %config.profile,
        "memsift server starting"
    );

    // 5. Assemble the analysis engine
    let engine = build_engine(&config).await?;
    let components = engine.components();
    tracing::info!(
        similarity = %components.similarity,
        summarizer = %components.summarizer,
        enrichment = %components.enrichment,
        "Analysis engine assembled"
    );

    // 6. Build the router with middleware
    let state = Arc::new(AppState::new(engine));
    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // 7. Serve until shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "memsift server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
