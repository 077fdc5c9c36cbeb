/// Worth-saving gate
///
/// Decides whether captured content deserves storage, and explains why.
/// Pure regex heuristics tuned for chat transcripts: AI response
/// phrasing, document structure, code, links, technical vocabulary,
/// and sheer length.

use regex::Regex;
use std::sync::LazyLock;

/// Reason reported when the gate rejects content.
pub const NOT_SUBSTANTIAL_REASON: &str = "Content not substantial enough";

/// Below this many characters nothing is worth saving.
const MIN_CONTENT_CHARS: usize = 20;

/// Above this many characters content passes on length alone.
const SUBSTANTIAL_CHARS: usize = 100;

static AI_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)here's|here is|i can help|let me explain|based on|according to|in summary|to answer your question",
    )
    .unwrap()
});

static STRUCTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-•*]\s|^\s*\d+\.\s|:\s*$").unwrap());

static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*```|`[^`]+`").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static TECH_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)api|function|class|method|algorithm|database|server|client|framework|library")
        .unwrap()
});

// Reason reporting deliberately uses narrower patterns than the gate,
// so content can pass the gate yet fall back to the generic reason.
static REASON_AI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)here's|here is|i can help|let me explain").unwrap());

static REASON_STRUCTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-•*]\s|^\s*\d+\.\s").unwrap());

static REASON_TECH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)api|function|class|method|algorithm").unwrap());

/// True if the content passes the worth-saving gate.
pub fn is_worth_saving(content: &str) -> bool {
    let char_count = content.chars().count();
    if char_count < MIN_CONTENT_CHARS {
        return false;
    }

    AI_RESPONSE_RE.is_match(content)
        || STRUCTURE_RE.is_match(content)
        || CODE_SPAN_RE.is_match(content)
        || URL_RE.is_match(content)
        || TECH_HINT_RE.is_match(content)
        || char_count > SUBSTANTIAL_CHARS
}

/// Human-readable reasons why content passed the gate, joined with ", ".
///
/// Only meaningful for content that passed; content that triggers the
/// gate without matching any reason pattern reports "substantial
/// content".
pub fn save_reason(content: &str) -> String {
    let mut reasons = Vec::new();

    if content.chars().count() > SUBSTANTIAL_CHARS {
        reasons.push("substantial content");
    }
    if REASON_AI_RE.is_match(content) {
        reasons.push("AI response pattern");
    }
    if REASON_STRUCTURE_RE.is_match(content) {
        reasons.push("structured content");
    }
    if CODE_SPAN_RE.is_match(content) {
        reasons.push("contains code");
    }
    if URL_RE.is_match(content) {
        reasons.push("contains URLs");
    }
    if REASON_TECH_RE.is_match(content) {
        reasons.push("technical content");
    }

    if reasons.is_empty() {
        "substantial content".to_string()
    } else {
        reasons.join(", ")
    }
}
