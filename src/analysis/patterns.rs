/// Pattern-based extraction primitives
///
/// Pure functions over text: regexes, term tables, tokenization. No
/// models, no network, fully deterministic. The engine layers the
/// model-backed providers on top of these.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

// ---- Term tables ----

/// Technical vocabulary checked by substring against lowercased content.
/// Order is part of the contract: matched terms keep table order, which
/// feeds directly into tag assembly.
const TECHNICAL_TERMS: &[&str] = &[
    "api",
    "function",
    "class",
    "method",
    "algorithm",
    "database",
    "server",
    "client",
    "framework",
    "library",
    "package",
    "module",
    "component",
    "service",
    "endpoint",
    "request",
    "response",
    "authentication",
    "authorization",
    "encryption",
    "decryption",
    "compression",
    "caching",
    "load balancing",
    "scalability",
    "performance",
    "optimization",
    "debugging",
    "testing",
    "deployment",
    "monitoring",
    "logging",
    "javascript",
    "python",
    "react",
    "node",
    "html",
    "css",
    "sql",
    "git",
    "docker",
    "aws",
    "cloud",
    "security",
];

/// Sentences containing one of these count as facts.
const KEY_PHRASES: &[&str] = &["important", "key", "note", "remember", "essential", "critical"];

/// Common English words ignored by keyword extraction and sentence scoring.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

// ---- Regexes ----

static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s+([^.\n]+)").unwrap());

static BULLET_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-•*]\s+([^.\n]+)").unwrap());

static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\w+)?\n([\s\S]*?)```").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

// ---- Extraction functions ----

/// A code span found in content. Fenced blocks carry their fence
/// language (or "unknown"); backtick spans are labeled "inline".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Split content into trimmed, non-empty sentences on `.`, `!`, `?` runs.
pub fn split_sentences(content: &str) -> Vec<&str> {
    SENTENCE_SPLIT_RE
        .split(content)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Technical terms present in the content, in table order.
pub fn technical_terms(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    TECHNICAL_TERMS
        .iter()
        .filter(|&&term| lowered.contains(term))
        .map(|&term| term.to_string())
        .collect()
}

/// Extract discrete facts: numbered list items, then bullet items, then
/// sentences carrying a key phrase. Capped at 10.
pub fn extract_facts(content: &str) -> Vec<String> {
    let mut facts = Vec::new();

    for caps in NUMBERED_ITEM_RE.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            facts.push(m.as_str().trim().to_string());
        }
    }

    for caps in BULLET_ITEM_RE.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            facts.push(m.as_str().trim().to_string());
        }
    }

    for sentence in split_sentences(content) {
        let lowered = sentence.to_lowercase();
        if KEY_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            facts.push(sentence.to_string());
        }
    }

    facts.truncate(10);
    facts
}

/// Extract fenced code blocks and inline backtick spans.
///
/// Fenced and inline passes run independently over the whole content.
pub fn extract_code_blocks(content: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();

    for caps in FENCED_CODE_RE.captures_iter(content) {
        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or("unknown")
            .to_string();
        let code = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .unwrap_or("")
            .to_string();
        blocks.push(CodeBlock { language, code });
    }

    for caps in INLINE_CODE_RE.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            blocks.push(CodeBlock {
                language: "inline".to_string(),
                code: m.as_str().trim().to_string(),
            });
        }
    }

    blocks
}

/// Extract http/https URLs.
pub fn extract_urls(content: &str) -> Vec<String> {
    URL_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract hashtags without the leading `#`.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True if the word is a common English stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Keyword fallback when no enrichment model is available: the first
/// `limit` distinct lowercased tokens that are neither stopwords nor
/// shorter than three characters, in document order.
pub fn lexical_keywords(content: &str, limit: usize) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in lowered.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        if token.chars().count() <= 2 || is_stopword(token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            keywords.push(token.to_string());
            if keywords.len() == limit {
                break;
            }
        }
    }

    keywords
}

/// Prefix of `s` at most `max_chars` characters long, never splitting a
/// UTF-8 codepoint.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
