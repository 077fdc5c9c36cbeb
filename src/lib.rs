//! Local content analysis backend for AI memory capture.
//!
//! Classifies, summarizes, tags, and ranks short pieces of text so a
//! memory store (typically a browser extension capturing chat content)
//! can decide what to keep and how to retrieve it. Model-backed work
//! (embeddings, abstractive summaries, keyword/entity enrichment) runs
//! behind pluggable providers; pattern-based fallbacks keep every
//! operation available when no model is reachable.

pub mod analysis;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod enrichment;
pub mod errors;
pub mod logging;
pub mod search;
pub mod server;
pub mod similarity;
pub mod summarization;

pub use engine::AnalysisEngine;
pub use errors::MemsiftError;
pub use server::{create_router, AppState};
