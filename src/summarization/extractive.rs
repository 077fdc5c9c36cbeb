/// Extractive fallback summarization
///
/// Frequency-scored sentence selection. Deterministic, no models. Runs
/// directly in the lite profile and whenever the abstractive provider
/// fails.

use std::collections::HashMap;

use crate::analysis::patterns::{is_stopword, split_sentences, truncate_chars};

/// Inputs shorter than this pass through unsummarized.
pub const MIN_SUMMARY_INPUT_CHARS: usize = 100;

/// Summarize by selecting the highest-scoring sentences.
///
/// Sentences score the sum of document-wide frequencies of their
/// non-stopword tokens. The sort is stable, so tied sentences keep
/// encounter order. Selected sentences are concatenated greedily while
/// the running summary stays within max_length characters.
pub fn extractive_summary(text: &str, max_length: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= 2 {
        return truncate_chars(text, max_length).to_string();
    }

    // Frequencies of non-stopword tokens longer than two characters
    let mut word_freq: HashMap<String, usize> = HashMap::new();
    for sentence in &sentences {
        for word in sentence.to_lowercase().split_whitespace() {
            if !is_stopword(word) && word.chars().count() > 2 {
                *word_freq.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut scored: Vec<(&str, usize)> = sentences
        .iter()
        .map(|&sentence| {
            let score = sentence
                .to_lowercase()
                .split_whitespace()
                .filter(|word| !is_stopword(word))
                .map(|word| word_freq.get(word).copied().unwrap_or(0))
                .sum();
            (sentence, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut summary = String::new();
    for (sentence, _) in scored {
        if summary.chars().count() + sentence.chars().count() <= max_length {
            summary.push_str(sentence);
            summary.push(' ');
        } else {
            break;
        }
    }

    summary.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences_truncated_not_scored() {
        let text = "First sentence here. Second one.";
        let summary = extractive_summary(text, 15);
        assert_eq!(summary.chars().count(), 15);
        assert!(summary.starts_with("First"));
    }

    #[test]
    fn test_high_frequency_sentences_win() {
        let text =
            "Rust compiles fast. The weather is nice. Rust tooling is great. Lunch was okay.";
        let summary = extractive_summary(text, 45);
        assert_eq!(summary, "Rust compiles fast Rust tooling is great");
    }

    #[test]
    fn test_respects_length_budget() {
        let text = "Alpha beta gamma delta. Epsilon zeta eta theta. Iota kappa lambda mu. \
                    Nu xi omicron pi.";
        let summary = extractive_summary(text, 50);
        assert!(summary.chars().count() <= 50);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_zero_budget_yields_empty_summary() {
        let text = "One sentence. Two sentences. Three sentences. Four sentences.";
        assert_eq!(extractive_summary(text, 0), "");
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let text = "Cats sleep all day. Dogs bark at night. Cats also chase mice. Fish swim.";
        let summary = extractive_summary(text, 60);
        assert_eq!(summary, summary.trim());
    }
}
