/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: memsift.toml (in working directory)
/// 3. Environment variables: prefixed MEMSIFT_, nested keys joined with
///    double underscores (e.g., MEMSIFT_EMBEDDING__PROVIDER=openai)

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::errors::MemsiftError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Analysis profile: "full" wires model-backed providers,
    /// "lite" runs on heuristics alone (no downloads, no network)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Abort startup when a provider fails to initialize instead of
    /// degrading to heuristics
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub summarization: SummarizationConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: "local" (on-device model) or "openai"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Model cache directory for the local provider.
    /// Defaults to the platform cache dir (~/.cache/memsift/models on Linux).
    #[serde(default)]
    pub cache_dir: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_embedding_openai_model")]
    pub openai_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    /// Summary provider: "ollama" or "openai"
    #[serde(default = "default_text_provider")]
    pub provider: String,

    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Inputs longer than this are truncated before being sent to the model
    #[serde(default = "default_summarization_max_chars")]
    pub max_content_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Keyword/entity provider: "ollama" or "openai"
    #[serde(default = "default_text_provider")]
    pub provider: String,

    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Inputs longer than this are truncated before being sent to the model
    #[serde(default = "default_enrichment_max_chars")]
    pub max_content_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Similarity above which two memories count as duplicates
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,

    /// Similarity above which memories are grouped together
    #[serde(default = "default_group_threshold")]
    pub group_threshold: f64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_profile() -> String {
    "full".to_string()
}

fn default_embedding_provider() -> String {
    "local".to_string()
}

fn default_embedding_openai_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_text_provider() -> String {
    "ollama".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_summarization_max_chars() -> usize {
    4000
}

fn default_enrichment_max_chars() -> usize {
    2000
}

fn default_duplicate_threshold() -> f64 {
    0.8
}

fn default_group_threshold() -> f64 {
    0.7
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            profile: default_profile(),
            strict: false,
            embedding: EmbeddingConfig::default(),
            summarization: SummarizationConfig::default(),
            enrichment: EnrichmentConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            provider: default_embedding_provider(),
            cache_dir: None,
            openai_api_key: None,
            openai_model: default_embedding_openai_model(),
        }
    }
}

impl EmbeddingConfig {
    /// Model cache directory: the configured path, or the platform cache
    /// dir under memsift/models.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("memsift")
                .join("models"),
        }
    }
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        SummarizationConfig {
            provider: default_text_provider(),
            ollama_base_url: default_ollama_base_url(),
            ollama_model: default_ollama_model(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            max_content_chars: default_summarization_max_chars(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        EnrichmentConfig {
            provider: default_text_provider(),
            ollama_base_url: default_ollama_base_url(),
            ollama_model: default_ollama_model(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            max_content_chars: default_enrichment_max_chars(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            duplicate_threshold: default_duplicate_threshold(),
            group_threshold: default_group_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: MEMSIFT_LOG_LEVEL=debug overrides log_level in memsift.toml
    pub fn load() -> Result<Config, MemsiftError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("memsift.toml"))
            .merge(Env::prefixed("MEMSIFT_").split("__"))
            .extract()
            .map_err(|e| MemsiftError::Config(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would misbehave at runtime
    pub fn validate(&self) -> Result<(), MemsiftError> {
        if self.port == 0 {
            return Err(MemsiftError::Config("port must be non-zero".to_string()));
        }
        match self.profile.as_str() {
            "full" | "lite" => {}
            other => {
                return Err(MemsiftError::Config(format!(
                    "profile must be \"full\" or \"lite\", got \"{}\"",
                    other
                )));
            }
        }
        let valid_level = matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        );
        if !valid_level {
            return Err(MemsiftError::Config(format!(
                "log_level must be one of trace, debug, info, warn, error, got \"{}\"",
                self.log_level
            )));
        }
        for (name, value) in [
            ("ranking.duplicate_threshold", self.ranking.duplicate_threshold),
            ("ranking.group_threshold", self.ranking.group_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MemsiftError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("summarization.max_content_chars", self.summarization.max_content_chars),
            ("enrichment.max_content_chars", self.enrichment.max_content_chars),
        ] {
            if value < 100 {
                return Err(MemsiftError::Config(format!(
                    "{} must be at least 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
