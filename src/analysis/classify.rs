/// Rule-based content categorization
///
/// Scores content against fixed keyword tables; the score for a
/// category is the fraction of its keywords found as substrings of the
/// lowercased content. Declaration order breaks ties, and content that
/// matches nothing falls back to the first category with confidence 0.0.

use serde::Serialize;
use std::collections::BTreeMap;

/// Category keyword tables. Both the table order and each list's length
/// are part of the scoring contract.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "code",
        &[
            "function", "class", "method", "api", "code", "programming", "algorithm",
            "variable", "loop", "condition", "database", "query", "sql", "javascript",
            "python", "react", "node", "html", "css", "git", "docker", "aws",
        ],
    ),
    (
        "troubleshooting",
        &[
            "error", "bug", "fix", "issue", "problem", "debug", "crash", "exception",
            "warning", "failed", "broken", "not working", "solution", "resolve",
        ],
    ),
    (
        "how-to",
        &[
            "how to", "tutorial", "guide", "step", "instruction", "procedure",
            "walkthrough", "setup", "install", "configure", "tutorial",
        ],
    ),
    (
        "explanation",
        &[
            "explain", "what is", "definition", "meaning", "concept", "theory",
            "understand", "clarify", "describe", "elaborate",
        ],
    ),
    (
        "comparison",
        &[
            "compare", "difference", "vs", "versus", "alternative", "option",
            "pros and cons", "advantages", "disadvantages", "better", "worse",
        ],
    ),
    (
        "recommendation",
        &[
            "recommend", "suggest", "best", "optimal", "preferred", "choice", "advice",
            "tip", "should", "recommended", "suggestion",
        ],
    ),
    (
        "example",
        &[
            "example", "sample", "instance", "case", "demonstration", "illustration",
            "for instance", "such as", "like",
        ],
    ),
];

/// Outcome of categorizing one piece of content.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResult {
    pub category: String,
    pub confidence: f64,
    pub all_scores: BTreeMap<String, f64>,
}

/// Categorize content against the keyword tables.
pub fn classify(content: &str) -> CategoryResult {
    let lowered = content.to_lowercase();

    let mut all_scores = BTreeMap::new();
    let mut best_category = "";
    let mut best_score = -1.0;

    for &(category, keywords) in CATEGORY_KEYWORDS {
        let hits = keywords.iter().filter(|&&kw| lowered.contains(kw)).count();
        let score = hits as f64 / keywords.len() as f64;
        all_scores.insert(category.to_string(), score);

        // Strictly greater keeps the first-declared category on ties
        if score > best_score {
            best_score = score;
            best_category = category;
        }
    }

    CategoryResult {
        category: best_category.to_string(),
        confidence: best_score,
        all_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_code_content() {
        let result = classify("Write a function with a loop in python");
        assert_eq!(result.category, "code");
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_classify_troubleshooting_beats_code() {
        let result = classify("Fix the error: debug the crash and resolve the exception");
        assert_eq!(result.category, "troubleshooting");
    }

    #[test]
    fn test_classify_no_match_falls_back_to_first_category() {
        let result = classify("zzz qqq");
        assert_eq!(result.category, "code");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_classify_tie_prefers_first_declared() {
        // One hit in "comparison" (vs) and one in "recommendation"
        // (recommend), both lists have eleven entries
        let result = classify("vs recommend");
        assert_eq!(result.category, "comparison");
    }

    #[test]
    fn test_classify_confidence_is_hit_fraction() {
        let result = classify("error bug fix");
        assert_eq!(result.category, "troubleshooting");
        assert!((result.confidence - 3.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_scores_covers_every_category() {
        let result = classify("anything at all");
        assert_eq!(result.all_scores.len(), 7);
        for key in [
            "code",
            "troubleshooting",
            "how-to",
            "explanation",
            "comparison",
            "recommendation",
            "example",
        ] {
            assert!(result.all_scores.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let result = classify("ERROR: the BUG made everything CRASH");
        assert_eq!(result.category, "troubleshooting");
    }
}
