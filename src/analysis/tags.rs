/// Tag assembly
///
/// Combines hashtags, technical terms, enriched keywords, and selected
/// entity types into one deduplicated tag list for storage alongside a
/// memory.

use std::collections::HashSet;

use super::patterns::{extract_hashtags, technical_terms};
use crate::enrichment::Enrichment;

/// Maximum number of tags returned.
const MAX_TAGS: usize = 15;

/// Keywords contribute at most this many tags.
const KEYWORD_TAG_LIMIT: usize = 5;

/// Entity labels worth tagging.
const ENTITY_TAG_LABELS: &[&str] = &["PERSON", "ORG", "PRODUCT", "GPE"];

/// Assemble tags in priority order: hashtags, technical terms, the top
/// enriched keywords, then entity names lowercased. First occurrence
/// wins on duplicates and the list caps at 15.
pub fn assemble_tags(content: &str, enrichment: &Enrichment) -> Vec<String> {
    let mut tags = extract_hashtags(content);
    tags.extend(technical_terms(content));
    tags.extend(enrichment.keywords.iter().take(KEYWORD_TAG_LIMIT).cloned());
    tags.extend(
        enrichment
            .entities
            .iter()
            .filter(|e| ENTITY_TAG_LABELS.contains(&e.label.as_str()))
            .map(|e| e.text.to_lowercase()),
    );

    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
    tags.truncate(MAX_TAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::NamedEntity;

    fn enrichment_with(keywords: &[&str], entities: &[(&str, &str)]) -> Enrichment {
        Enrichment {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            entities: entities
                .iter()
                .map(|(text, label)| NamedEntity {
                    text: text.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_tags_priority_order_and_dedupe() {
        let enrichment = enrichment_with(&["rollout", "api"], &[("Acme", "ORG")]);
        let tags = assemble_tags("#deploy notes about the api", &enrichment);
        // "api" appears as both technical term and keyword; the
        // technical-term occurrence wins
        assert_eq!(tags, vec!["deploy", "api", "rollout", "acme"]);
    }

    #[test]
    fn test_tags_entity_label_filter() {
        let enrichment = enrichment_with(&[], &[("Grace Hopper", "PERSON"), ("tomorrow", "DATE")]);
        let tags = assemble_tags("plain words only here", &enrichment);
        assert_eq!(tags, vec!["grace hopper"]);
    }

    #[test]
    fn test_tags_keyword_contribution_capped_at_five() {
        let enrichment = enrichment_with(
            &["one", "two", "three", "four", "five", "six", "seven"],
            &[],
        );
        let tags = assemble_tags("no markup here", &enrichment);
        assert_eq!(tags, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_tags_cap_at_fifteen() {
        let content = (1..=20)
            .map(|i| format!("#tag{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let tags = assemble_tags(&content, &Enrichment::default());
        assert_eq!(tags.len(), 15);
        assert_eq!(tags[0], "tag1");
        assert_eq!(tags[14], "tag15");
    }

    #[test]
    fn test_tags_empty_inputs() {
        assert!(assemble_tags("nothing special", &Enrichment::default()).is_empty());
    }
}
