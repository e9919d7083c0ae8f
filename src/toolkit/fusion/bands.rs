//! First-stage score bands.
//!
//! Each candidate keeps its first-stage score as an upper bound and the next
//! lower distinct first-stage score, raised by an offset, as its lower bound.
//! Fusion scores are mapped into that band, so a later stage can reorder
//! documents within a band but never move one across a band boundary.

use std::collections::HashMap;

use tracing::debug;

use crate::core::error::{NarrankError, Result};
use crate::toolkit::ranking::{sort_ranking, ScoredDocument};


/// Supplies the first-stage ranking of a topic.
pub trait FirstStageScoreProvider {
    fn scores_for_topic(&self, topic_id: &str) -> Vec<ScoredDocument>;
}

impl FirstStageScoreProvider for crate::toolkit::runfile::TopicRuns {
    fn scores_for_topic(&self, topic_id: &str) -> Vec<ScoredDocument> {
        self.ranking(topic_id).to_vec()
    }
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBand {
    pub upper: f64,
    pub lower: f64,
}

impl ScoreBand {
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn validate(&self) -> Result<()> {
        let range = self.range();
        if self.lower > self.upper || self.lower < 0.0 || self.upper > 1.0 || range < 0.0 || range > 1.0 {
            return Err(NarrankError::Validation(format!(
                "Invalid first-stage band: lower {} upper {} range {}",
                self.lower, self.upper, range
            )));
        }
        Ok(())
    }

    /// Maps `score` into `[lower, upper]`. Out-of-range results are errors,
    /// never clamped.
    pub fn rescale(&self, score: f64) -> Result<f64> {
        self.validate()?;
        let normalized = self.lower + score * self.range();
        if !(0.0..=1.0).contains(&normalized) {
            return Err(NarrankError::Validation(format!(
                "Rescaled score {} for input {} leaves [0, 1]",
                normalized, score
            )));
        }
        Ok(normalized)
    }
}


#[derive(Debug, Clone, Default)]
pub struct FirstStageBands {
    bands: HashMap<String, ScoreBand>,
}

impl FirstStageBands {
    pub fn from_scores(scores: &[ScoredDocument], offset: f64) -> Self {
        let mut distinct: Vec<f64> = scores.iter().map(|d| d.score).collect();
        distinct.push(0.0);
        distinct.sort_by(|a, b| b.total_cmp(a));
        distinct.dedup();

        let bands = scores
            .iter()
            .map(|doc| {
                let below = distinct
                    .iter()
                    .copied()
                    .find(|s| *s < doc.score)
                    .unwrap_or(0.0);
                let band = ScoreBand {
                    upper: doc.score,
                    lower: below + offset,
                };
                (doc.document_id.clone(), band)
            })
            .collect();

        Self { bands }
    }

    pub fn for_topic(provider: &dyn FirstStageScoreProvider, topic_id: &str, offset: f64) -> Self {
        let scores = provider.scores_for_topic(topic_id);
        debug!("Topic {}: {} first-stage scores", topic_id, scores.len());
        Self::from_scores(&scores, offset)
    }

    pub fn band(&self, document_id: &str) -> Option<&ScoreBand> {
        self.bands.get(document_id)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Rescales a whole ranking and re-sorts it. Every document needs a band.
    pub fn apply(&self, ranking: &[ScoredDocument]) -> Result<Vec<ScoredDocument>> {
        let mut rescaled = ranking
            .iter()
            .map(|doc| {
                let band = self.band(&doc.document_id).ok_or_else(|| {
                    NarrankError::Validation(format!("No first-stage score for document {}", doc.document_id))
                })?;
                Ok(ScoredDocument::new(doc.document_id.clone(), band.rescale(doc.score)?))
            })
            .collect::<Result<Vec<_>>>()?;
        sort_ranking(&mut rescaled);
        Ok(rescaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::runfile::{parse_run, TopicRuns};
    use proptest::prelude::*;

    fn first_stage() -> Vec<ScoredDocument> {
        vec![
            ScoredDocument::new("a", 1.0),
            ScoredDocument::new("b", 0.5),
            ScoredDocument::new("c", 0.5),
            ScoredDocument::new("d", 0.2),
        ]
    }

    #[test]
    fn test_bands_use_next_lower_distinct_score() {
        let bands = FirstStageBands::from_scores(&first_stage(), 0.01);
        let a = bands.band("a").unwrap();
        assert_eq!(a.upper, 1.0);
        assert!((a.lower - 0.51).abs() < 1e-12);
        assert!((bands.band("b").unwrap().lower - 0.21).abs() < 1e-12);
        assert!((bands.band("d").unwrap().lower - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_within_band() {
        let band = ScoreBand { upper: 0.5, lower: 0.21 };
        assert!((band.rescale(0.0).unwrap() - 0.21).abs() < 1e-12);
        assert!((band.rescale(0.5).unwrap() - 0.355).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_bands_fail() {
        // a zero first-stage score cannot hold the offset
        let bands = FirstStageBands::from_scores(&[ScoredDocument::new("z", 0.0)], 0.01);
        assert!(matches!(bands.band("z").unwrap().rescale(0.3), Err(NarrankError::Validation(_))));

        assert!(ScoreBand { upper: 1.2, lower: 0.1 }.validate().is_err());
        assert!(ScoreBand { upper: 0.5, lower: -0.1 }.validate().is_err());
        assert!(ScoreBand { upper: 0.5, lower: 0.1 }.rescale(3.0).is_err());
    }

    #[test]
    fn test_apply_keeps_band_order() {
        let bands = FirstStageBands::from_scores(&first_stage(), 0.01);
        let fused = vec![
            ScoredDocument::new("d", 1.0),
            ScoredDocument::new("c", 0.9),
            ScoredDocument::new("b", 0.1),
            ScoredDocument::new("a", 0.0),
        ];
        let rescaled = bands.apply(&fused).unwrap();
        let order: Vec<&str> = rescaled.iter().map(|d| d.document_id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_apply_requires_first_stage_score() {
        let bands = FirstStageBands::from_scores(&first_stage(), 0.01);
        let result = bands.apply(&[ScoredDocument::new("stranger", 0.5)]);
        assert!(matches!(result, Err(NarrankError::Validation(_))));
    }

    #[test]
    fn test_bands_from_run_file() {
        let runs = TopicRuns::from_entries(&parse_run("7\tQ0\tx\t1\t0.8\tbm25\n7\tQ0\ty\t2\t0.4\tbm25\n").unwrap());
        let bands = FirstStageBands::for_topic(&runs, "7", 0.01);
        assert_eq!(bands.len(), 2);
        assert!((bands.band("x").unwrap().lower - 0.41).abs() < 1e-12);
        assert!(FirstStageBands::for_topic(&runs, "8", 0.01).is_empty());
    }

    proptest! {
        #[test]
        fn prop_rescaling_never_crosses_bands(
            docs in prop::collection::vec((1u32..=19, 0.0f64..=1.0), 1..40),
        ) {
            // first-stage scores on a 0.05 grid, fusion scores anywhere in [0, 1]
            let first: Vec<ScoredDocument> = docs
                .iter()
                .enumerate()
                .map(|(i, (step, _))| ScoredDocument::new(format!("d{}", i), *step as f64 * 0.05))
                .collect();
            let fused: Vec<ScoredDocument> = docs
                .iter()
                .enumerate()
                .map(|(i, (_, s))| ScoredDocument::new(format!("d{}", i), *s))
                .collect();

            let bands = FirstStageBands::from_scores(&first, 0.01);
            let rescaled = bands.apply(&fused).unwrap();
            let by_id: HashMap<&str, f64> = rescaled.iter().map(|d| (d.document_id.as_str(), d.score)).collect();

            for doc in &first {
                let band = bands.band(&doc.document_id).unwrap();
                let norm = by_id[doc.document_id.as_str()];
                prop_assert!(band.lower - 1e-12 <= norm && norm <= band.upper + 1e-12);
            }
            for hi in &first {
                for lo in &first {
                    if hi.score > lo.score {
                        prop_assert!(by_id[hi.document_id.as_str()] > by_id[lo.document_id.as_str()]);
                    }
                }
            }
        }
    }
}
