/// Secondary content signals
///
/// Complexity, sentiment, language, and conversational cues. All
/// lexicon or heuristic based, deterministic, and cheap enough to run
/// on every process-content call.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::patterns::{extract_code_blocks, technical_terms};

// ---- Complexity ----

#[derive(Debug, Clone, Serialize)]
pub struct ComplexityResult {
    pub complexity_level: String,
    pub complexity_score: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub technical_terms: usize,
    pub code_blocks: usize,
}

/// Weighted blend of technical vocabulary, code presence, and raw size.
pub fn complexity(content: &str) -> ComplexityResult {
    let sentence_count = content.split('.').count();
    let word_count = content.split_whitespace().count();
    let technical = technical_terms(content).len();
    let blocks = extract_code_blocks(content).len();

    let score = technical as f64 * 0.3
        + blocks as f64 * 0.4
        + word_count as f64 / 100.0 * 0.2
        + sentence_count as f64 / 10.0 * 0.1;

    let level = if score > 0.7 {
        "high"
    } else if score > 0.3 {
        "medium"
    } else {
        "low"
    };

    ComplexityResult {
        complexity_level: level.to_string(),
        complexity_score: score,
        word_count,
        sentence_count,
        technical_terms: technical,
        code_blocks: blocks,
    }
}

// ---- Sentiment ----

#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub sentiment: String,
    pub polarity: f64,
    pub subjectivity: f64,
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "awesome", "amazing", "wonderful", "fantastic", "perfect",
    "love", "best", "helpful", "useful", "easy", "fast", "clean", "simple", "nice", "happy",
    "thanks", "thank", "works", "working", "fixed", "solved", "success", "successful",
    "improved", "better", "clear", "correct", "reliable", "stable", "efficient", "powerful",
    "elegant", "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "worst", "broken", "fail", "failed",
    "failure", "error", "bug", "crash", "slow", "wrong", "difficult", "hard", "confusing",
    "unclear", "problem", "issue", "annoying", "ugly", "messy", "unstable", "unreliable",
    "poor", "useless", "impossible", "stuck", "missing",
];

/// Lexicon sentiment. Polarity is the signed share of sentiment-bearing
/// tokens, subjectivity their share of all tokens. Content with no
/// sentiment tokens is neutral with both scores 0.0.
pub fn sentiment(content: &str) -> SentimentResult {
    let lowered = content.to_lowercase();
    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut words = 0usize;

    for token in lowered.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            continue;
        }
        words += 1;
        if POSITIVE_WORDS.contains(&token) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&token) {
            negative += 1;
        }
    }

    let signal = positive + negative;
    let polarity = if signal > 0 {
        (positive as f64 - negative as f64) / signal as f64
    } else {
        0.0
    };
    let subjectivity = if words > 0 {
        signal as f64 / words as f64
    } else {
        0.0
    };

    let label = if polarity > 0.1 {
        "positive"
    } else if polarity < -0.1 {
        "negative"
    } else {
        "neutral"
    };

    SentimentResult {
        sentiment: label.to_string(),
        polarity,
        subjectivity,
    }
}

// ---- Language ----

/// Function-word markers per language tag. English is listed first and
/// wins ties.
const LANGUAGE_MARKERS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "is", "are", "was", "of", "to", "in", "that", "it", "for", "with",
            "you", "this", "have",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "las", "es", "son", "era", "de", "en", "que", "para", "con",
            "una", "por", "pero",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "est", "sont", "de", "en", "que", "pour", "avec", "une", "dans",
            "ce", "vous", "pas",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "ist", "sind", "und", "zu", "von", "mit", "für", "eine",
            "nicht", "ich", "auch", "auf",
        ],
    ),
];

/// Best-effort language tag from function-word counts. Defaults to "en"
/// when nothing matches.
pub fn detect_language(content: &str) -> String {
    let lowered = content.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut best_lang = "en";
    let mut best_hits = 0usize;
    for &(lang, markers) in LANGUAGE_MARKERS {
        let hits = tokens.iter().filter(|&&t| markers.contains(&t)).count();
        if hits > best_hits {
            best_hits = hits;
            best_lang = lang;
        }
    }

    best_lang.to_string()
}

// ---- Conversational cues ----

static QUESTION_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(what|how|why|when|where|who|which|can|could|would|should|is|are|do|does|did)\s")
        .unwrap()
});

static QUESTION_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(what|how|why|when|where|who|which)\b").unwrap());

static ANSWER_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"here's|here is|i can help|let me explain|based on|according to|in summary|to answer your question",
    )
    .unwrap()
});

/// True when content looks like a question: trailing question mark,
/// interrogative opener, or an interrogative word anywhere.
pub fn has_question(content: &str) -> bool {
    let lowered = content.to_lowercase();
    lowered.trim_end().ends_with('?')
        || QUESTION_START_RE.is_match(&lowered)
        || QUESTION_WORD_RE.is_match(&lowered)
}

/// True when content reads like an assistant answer.
pub fn has_answer(content: &str) -> bool {
    ANSWER_PATTERN_RE.is_match(&content.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_empty_content() {
        let result = complexity("");
        assert_eq!(result.word_count, 0);
        assert_eq!(result.sentence_count, 1);
        assert_eq!(result.complexity_level, "low");
    }

    #[test]
    fn test_complexity_plain_note_is_low() {
        let result = complexity("Just a tiny note");
        assert_eq!(result.complexity_level, "low");
        assert_eq!(result.technical_terms, 0);
        assert_eq!(result.code_blocks, 0);
        assert_eq!(result.word_count, 4);
    }

    #[test]
    fn test_complexity_single_term_is_medium() {
        let result = complexity("The database has daily backups");
        assert_eq!(result.complexity_level, "medium");
        assert_eq!(result.technical_terms, 1);
    }

    #[test]
    fn test_complexity_code_heavy_is_high() {
        let result = complexity("Call `foo()` then `bar()`");
        assert_eq!(result.complexity_level, "high");
        assert_eq!(result.code_blocks, 2);
    }

    #[test]
    fn test_sentiment_positive() {
        let result = sentiment("This is great and works perfectly, really good stuff");
        assert_eq!(result.sentiment, "positive");
        assert!(result.polarity > 0.1);
        assert!(result.subjectivity > 0.0);
    }

    #[test]
    fn test_sentiment_negative() {
        let result = sentiment("The broken build failed with an awful error");
        assert_eq!(result.sentiment, "negative");
        assert!(result.polarity < -0.1);
    }

    #[test]
    fn test_sentiment_neutral_without_signal_words() {
        let result = sentiment("The sky is blue today");
        assert_eq!(result.sentiment, "neutral");
        assert_eq!(result.polarity, 0.0);
        assert_eq!(result.subjectivity, 0.0);
    }

    #[test]
    fn test_sentiment_balanced_is_neutral() {
        let result = sentiment("good but bad");
        assert_eq!(result.sentiment, "neutral");
        assert_eq!(result.polarity, 0.0);
    }

    #[test]
    fn test_language_defaults_to_english() {
        assert_eq!(detect_language(""), "en");
        assert_eq!(detect_language("zzz qqq"), "en");
    }

    #[test]
    fn test_language_detects_spanish() {
        assert_eq!(
            detect_language("el problema es que la casa es grande para los dos"),
            "es"
        );
    }

    #[test]
    fn test_language_detects_french() {
        assert_eq!(detect_language("le projet est dans une bonne voie pour vous"), "fr");
    }

    #[test]
    fn test_language_detects_german() {
        assert_eq!(detect_language("das ist nicht gut und ich bin auch müde"), "de");
    }

    #[test]
    fn test_has_question_trailing_mark() {
        assert!(has_question("Tell me about lifetimes?"));
    }

    #[test]
    fn test_has_question_interrogative_opener() {
        assert!(has_question("What time does the job run"));
    }

    #[test]
    fn test_has_question_interrogative_word_inline() {
        assert!(has_question("I wonder which option fits"));
    }

    #[test]
    fn test_has_question_false_for_statements() {
        assert!(!has_question("Ship it tomorrow morning"));
    }

    #[test]
    fn test_has_answer_patterns() {
        assert!(has_answer("Based on the docs, yes"));
        assert!(has_answer("Here's the config you need"));
        assert!(!has_answer("Sure thing"));
    }
}
