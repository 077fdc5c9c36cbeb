/// Memory search and ranking
///
/// Ranks caller-provided candidate memories against a query with a
/// blended similarity score, finds near-duplicates, and groups related
/// memories. No storage involved: the caller owns persistence and ships
/// candidates with each request.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::RankingConfig;
use crate::similarity::{jaccard_similarity, SimilarityEstimator};

/// Results returned when the caller does not supply a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Weight of the semantic similarity leg in the blended score.
pub const SIMILARITY_WEIGHT: f64 = 0.7;

/// Weight of the keyword overlap leg in the blended score.
pub const KEYWORD_WEIGHT: f64 = 0.3;

/// A memory sent by the client for ranking. Only `content` is
/// interpreted; every other field round-trips untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A ranked memory with its score breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMemory {
    #[serde(flatten)]
    pub record: MemoryRecord,
    /// Estimator similarity between query and content
    pub similarity_score: f64,
    /// Jaccard token overlap between query and content
    pub keyword_score: f64,
    /// Blended ranking score
    pub combined_score: f64,
}

/// A near-duplicate of the probe content.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateMatch {
    #[serde(flatten)]
    pub record: MemoryRecord,
    pub similarity_score: f64,
}

/// Ranks, deduplicates, and groups memories through one shared
/// similarity estimator.
pub struct MemoryRanker {
    estimator: Arc<dyn SimilarityEstimator>,
    duplicate_threshold: f64,
    group_threshold: f64,
}

impl MemoryRanker {
    pub fn new(estimator: Arc<dyn SimilarityEstimator>, config: &RankingConfig) -> Self {
        MemoryRanker {
            estimator,
            duplicate_threshold: config.duplicate_threshold,
            group_threshold: config.group_threshold,
        }
    }

    /// Rank candidates against the query, best first, truncated to limit.
    ///
    /// An empty query or candidate list yields no results rather than an
    /// error. The sort is stable, so equally scored memories keep their
    /// submission order.
    pub async fn rank(
        &self,
        query: &str,
        candidates: Vec<MemoryRecord>,
        limit: usize,
    ) -> Vec<ScoredMemory> {
        if query.trim().is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for mut record in candidates {
            let similarity_score = self.estimator.score(query, &record.content).await;
            let keyword_score = jaccard_similarity(query, &record.content);
            let combined_score =
                SIMILARITY_WEIGHT * similarity_score + KEYWORD_WEIGHT * keyword_score;
            // Re-submitted results may carry score fields from an earlier
            // response; the fresh scores replace them.
            record.extra.remove("similarity_score");
            record.extra.remove("keyword_score");
            record.extra.remove("combined_score");
            scored.push(ScoredMemory {
                record,
                similarity_score,
                keyword_score,
                combined_score,
            });
        }

        scored.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    /// Find stored memories whose content is a near-duplicate of the
    /// probe: similarity strictly above the duplicate threshold.
    pub async fn find_duplicates(
        &self,
        content: &str,
        existing: Vec<MemoryRecord>,
    ) -> Vec<DuplicateMatch> {
        let mut duplicates = Vec::new();
        for mut record in existing {
            let similarity_score = self.estimator.score(content, &record.content).await;
            if similarity_score > self.duplicate_threshold {
                record.extra.remove("similarity_score");
                duplicates.push(DuplicateMatch {
                    record,
                    similarity_score,
                });
            }
        }
        duplicates
    }

    /// Group memories by similarity in one pass over submission order.
    ///
    /// Each unprocessed memory seeds a group and absorbs later
    /// unprocessed memories scoring above the group threshold against
    /// that seed. No transitive merging: a memory close to an absorbed
    /// member but not to the seed starts its own group.
    pub async fn group_similar(&self, records: Vec<MemoryRecord>) -> Vec<Vec<MemoryRecord>> {
        let mut groups: Vec<Vec<MemoryRecord>> = Vec::new();
        let mut processed = vec![false; records.len()];

        for i in 0..records.len() {
            if processed[i] {
                continue;
            }
            processed[i] = true;
            let mut group = vec![records[i].clone()];

            for j in (i + 1)..records.len() {
                if processed[j] {
                    continue;
                }
                let similarity = self
                    .estimator
                    .score(&records[i].content, &records[j].content)
                    .await;
                if similarity > self.group_threshold {
                    group.push(records[j].clone());
                    processed[j] = true;
                }
            }

            groups.push(group);
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::LexicalSimilarity;
    use async_trait::async_trait;

    fn record(content: &str) -> MemoryRecord {
        MemoryRecord {
            content: content.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    fn lexical_ranker() -> MemoryRanker {
        MemoryRanker::new(Arc::new(LexicalSimilarity), &RankingConfig::default())
    }

    struct FixedEstimator {
        score: f64,
    }

    #[async_trait]
    impl SimilarityEstimator for FixedEstimator {
        async fn score(&self, _a: &str, _b: &str) -> f64 {
            self.score
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_rank_empty_query_yields_nothing() {
        let ranker = lexical_ranker();
        let results = ranker.rank("  ", vec![record("anything")], 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_rank_no_candidates_yields_nothing() {
        let ranker = lexical_ranker();
        let results = ranker.rank("query", Vec::new(), 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_rank_orders_by_blended_score() {
        let ranker = lexical_ranker();
        let candidates = vec![
            record("cooking pasta recipes"),
            record("rust sync threads"),
            record("rust async runtime"),
        ];
        let results = ranker.rank("rust async runtime", candidates, 5).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].record.content, "rust async runtime");
        assert_eq!(results[1].record.content, "rust sync threads");
        assert_eq!(results[2].record.content, "cooking pasta recipes");
    }

    #[tokio::test]
    async fn test_rank_blends_both_score_legs() {
        // Estimator pinned away from the Jaccard value so the two legs
        // and their weights are separately visible in the blend
        let ranker = MemoryRanker::new(
            Arc::new(FixedEstimator { score: 0.9 }),
            &RankingConfig::default(),
        );
        let results = ranker
            .rank("rust async runtime", vec![record("rust sync threads")], 5)
            .await;
        assert!((results[0].similarity_score - 0.9).abs() < 1e-9);
        assert!((results[0].keyword_score - 0.2).abs() < 1e-9);
        assert!((results[0].combined_score - (0.7 * 0.9 + 0.3 * 0.2)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rank_lexical_estimator_scores_both_legs_identically() {
        let ranker = lexical_ranker();
        let results = ranker
            .rank("rust async runtime", vec![record("rust sync threads")], 5)
            .await;
        // Under the lexical strategy both legs reduce to the same Jaccard value
        assert!((results[0].similarity_score - 0.2).abs() < 1e-9);
        assert_eq!(results[0].similarity_score, results[0].keyword_score);
    }

    #[tokio::test]
    async fn test_rank_respects_limit() {
        let ranker = lexical_ranker();
        let candidates = vec![
            record("rust one"),
            record("rust two"),
            record("rust three"),
        ];
        let results = ranker.rank("rust", candidates, 2).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_rank_preserves_extra_fields() {
        let ranker = lexical_ranker();
        let mut extra = serde_json::Map::new();
        extra.insert("id".to_string(), serde_json::json!(42));
        let candidates = vec![MemoryRecord {
            content: "rust memory notes".to_string(),
            extra,
        }];
        let results = ranker.rank("rust", candidates, 5).await;
        assert_eq!(results[0].record.extra["id"], serde_json::json!(42));
    }

    #[tokio::test]
    async fn test_rank_replaces_stale_scores_on_resubmitted_results() {
        let ranker = lexical_ranker();
        let mut extra = serde_json::Map::new();
        extra.insert("id".to_string(), serde_json::json!(7));
        extra.insert("similarity_score".to_string(), serde_json::json!(0.01));
        extra.insert("keyword_score".to_string(), serde_json::json!(0.01));
        extra.insert("combined_score".to_string(), serde_json::json!(0.01));
        let candidates = vec![MemoryRecord {
            content: "rust".to_string(),
            extra,
        }];

        let results = ranker.rank("rust", candidates, 5).await;
        assert!((results[0].combined_score - 1.0).abs() < 1e-9);
        assert!(!results[0].record.extra.contains_key("similarity_score"));
        assert!(!results[0].record.extra.contains_key("keyword_score"));
        assert!(!results[0].record.extra.contains_key("combined_score"));
        assert_eq!(results[0].record.extra["id"], serde_json::json!(7));

        // The serialized result carries exactly one value per score key
        let serialized = serde_json::to_string(&results[0]).unwrap();
        assert_eq!(serialized.matches("\"combined_score\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        assert!((value["combined_score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_find_duplicates_requires_strictly_above_threshold() {
        let ranker = lexical_ranker();
        let existing = vec![
            // Identical: Jaccard 1.0, above 0.8
            record("alpha beta gamma delta"),
            // Four of five shared tokens: Jaccard exactly 0.8, excluded
            record("alpha beta gamma delta epsilon"),
            record("unrelated content entirely"),
        ];
        let duplicates = ranker
            .find_duplicates("alpha beta gamma delta", existing)
            .await;
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].record.content, "alpha beta gamma delta");
        assert!((duplicates[0].similarity_score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_find_duplicates_refreshes_carried_similarity_score() {
        let ranker = lexical_ranker();
        let mut extra = serde_json::Map::new();
        extra.insert("similarity_score".to_string(), serde_json::json!(0.05));
        let existing = vec![MemoryRecord {
            content: "alpha beta gamma delta".to_string(),
            extra,
        }];

        let duplicates = ranker
            .find_duplicates("alpha beta gamma delta", existing)
            .await;
        assert_eq!(duplicates.len(), 1);
        assert!(!duplicates[0].record.extra.contains_key("similarity_score"));
        assert!((duplicates[0].similarity_score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_group_similar_clusters_matching_content() {
        let ranker = lexical_ranker();
        let records = vec![
            record("alpha beta gamma"),
            record("alpha beta gamma"),
            record("totally different words"),
        ];
        let groups = ranker.group_similar(records).await;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[1][0].content, "totally different words");
    }

    #[tokio::test]
    async fn test_group_similar_never_merges_transitively() {
        let ranker = lexical_ranker();
        // second ~ first (5/7) and third ~ second (6/8), but third is not
        // close enough to the first, which seeds the group
        let records = vec![
            record("alpha beta gamma delta epsilon one"),
            record("alpha beta gamma delta epsilon two"),
            record("alpha beta gamma delta epsilon two three four"),
        ];
        let groups = ranker.group_similar(records).await;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(
            groups[1][0].content,
            "alpha beta gamma delta epsilon two three four"
        );
    }

    #[tokio::test]
    async fn test_group_similar_isolated_records() {
        let ranker = lexical_ranker();
        let records = vec![
            record("alpha beta"),
            record("gamma delta"),
            record("epsilon zeta"),
        ];
        let groups = ranker.group_similar(records).await;
        assert_eq!(groups.len(), 3);
        for group in &groups {
            assert_eq!(group.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_group_similar_empty_input() {
        let ranker = lexical_ranker();
        assert!(ranker.group_similar(Vec::new()).await.is_empty());
    }
}
