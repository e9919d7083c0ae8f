use tracing::{debug, warn};

use super::config::FusionConfig;
use super::score_table::ScoreTable;
use crate::core::error::{NarrankError, Result};
use crate::toolkit::ranking::{sort_ranking, ScoredDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingScore {
    pub ranker: String,
    pub document_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct FusionOutcome {
    pub ranking: Vec<ScoredDocument>,
    /// Terms left out of the weighted sum.
    pub missing: Vec<MissingScore>,
}

pub struct WeightedFusionRanker {
    config: FusionConfig,
}

impl WeightedFusionRanker {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> String {
        self.config.label()
    }

    /// Weighted sum of the available base scores per candidate.
    ///
    /// A missing `(ranker, document)` entry drops that term and is reported,
    /// it is not read as a zero score.
    pub fn rank(&self, topic_id: &str, candidates: &[String], table: &ScoreTable) -> FusionOutcome {
        let mut outcome = FusionOutcome::default();

        for document_id in candidates {
            let mut score = 0.0;
            for (ranker, weight) in self.config.iter() {
                match table.get(ranker, topic_id, document_id) {
                    Some(base) => score += weight * base,
                    None => {
                        warn!(
                            "No score from {} for document {} in topic {}, term skipped",
                            ranker, document_id, topic_id
                        );
                        outcome.missing.push(MissingScore {
                            ranker: ranker.to_string(),
                            document_id: document_id.clone(),
                        });
                    }
                }
            }
            outcome.ranking.push(ScoredDocument::new(document_id.clone(), score));
        }

        sort_ranking(&mut outcome.ranking);
        debug!(
            "Fused {} candidates for topic {} with {} missing terms",
            outcome.ranking.len(),
            topic_id,
            outcome.missing.len()
        );
        outcome
    }
}

/// Fails on the first score outside `[0, 1]`.
pub fn ensure_unit_interval(ranking: &[ScoredDocument]) -> Result<()> {
    match ranking.iter().find(|d| !(0.0..=1.0).contains(&d.score)) {
        Some(doc) => Err(NarrankError::Validation(format!(
            "Document {} received a score not in [0, 1]: {}",
            doc.document_id, doc.score
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ranker() -> WeightedFusionRanker {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        WeightedFusionRanker::new(FusionConfig::new(names, vec![0.5, 0.25, 0.25], 0.0).unwrap())
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weighted_sum() {
        let mut table = ScoreTable::new();
        for (ranker, score) in [("a", 1.0), ("b", 0.5), ("c", 0.0)] {
            table.insert(ranker, "1", "d1", score);
        }
        for (ranker, score) in [("a", 0.5), ("b", 1.0), ("c", 1.0)] {
            table.insert(ranker, "1", "d2", score);
        }

        let outcome = ranker().rank("1", &ids(&["d1", "d2"]), &table);
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.ranking[0].document_id, "d2");
        assert!((outcome.ranking[0].score - 0.75).abs() < 1e-12);
        assert!((outcome.ranking[1].score - 0.625).abs() < 1e-12);
        assert!(ensure_unit_interval(&outcome.ranking).is_ok());
    }

    #[test]
    fn test_missing_entry_is_skipped_not_zeroed() {
        let mut table = ScoreTable::new();
        table.insert("a", "1", "d1", 0.8);
        table.insert("c", "1", "d1", 0.4);

        let outcome = ranker().rank("1", &ids(&["d1"]), &table);
        assert_eq!(
            outcome.missing,
            vec![MissingScore {
                ranker: "b".to_string(),
                document_id: "d1".to_string()
            }]
        );
        assert!((outcome.ranking[0].score - (0.5 * 0.8 + 0.25 * 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_candidate_without_any_score() {
        let outcome = ranker().rank("1", &ids(&["ghost"]), &ScoreTable::new());
        assert_eq!(outcome.missing.len(), 3);
        assert_eq!(outcome.ranking[0].score, 0.0);
    }

    #[test]
    fn test_unit_interval_check() {
        let ranking = vec![ScoredDocument::new("ok", 1.0), ScoredDocument::new("bad", 1.2)];
        assert!(matches!(ensure_unit_interval(&ranking), Err(NarrankError::Validation(_))));
        assert!(ensure_unit_interval(&[ScoredDocument::new("nan", f64::NAN)]).is_err());
    }

    proptest! {
        #[test]
        fn prop_fused_score_is_exact_weighted_sum(
            scores in prop::collection::vec(prop::option::of(0.0f64..=1.0), 3),
        ) {
            let mut table = ScoreTable::new();
            for (name, score) in ["a", "b", "c"].iter().zip(&scores) {
                if let Some(score) = score {
                    table.insert(name, "t", "d", *score);
                }
            }
            let fused = ranker().rank("t", &ids(&["d"]), &table);

            let mut expected = 0.0;
            for (weight, score) in [0.5, 0.25, 0.25].iter().zip(&scores) {
                if let Some(score) = score {
                    expected += weight * score;
                }
            }
            prop_assert_eq!(fused.ranking[0].score, expected);
            prop_assert_eq!(fused.missing.len(), scores.iter().filter(|s| s.is_none()).count());
            prop_assert!(ensure_unit_interval(&fused.ranking).is_ok());
        }
    }
}
