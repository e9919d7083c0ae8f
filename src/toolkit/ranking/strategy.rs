//! A ranking strategy is a scoring function plugged into one of the two
//! shared normalization schemes.
//!
//! Component strategies score each query component separately, divide by the
//! per-component maximum over the candidate set and sum with the component
//! weights. Pairwise strategies score every unordered component pair, credit
//! half of each normalized pair score to both of its components and average
//! over the number of pairs. A maximum of zero excludes that component from
//! normalization; it never divides.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::component::ComponentScorer;
use super::models::{sort_ranking, ScoredDocument};
use super::pairwise::PairScorer;
use crate::toolkit::document::DocumentGraph;
use crate::toolkit::query::QueryConceptModel;


#[derive(Clone)]
pub enum StrategyKind {
    Component(Arc<dyn ComponentScorer>),
    Pairwise(Arc<dyn PairScorer>),
}

impl fmt::Debug for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Component(_) => f.write_str("Component"),
            StrategyKind::Pairwise(_) => f.write_str("Pairwise"),
        }
    }
}


#[derive(Debug, Clone)]
pub struct RankingStrategy {
    name: String,
    kind: StrategyKind,
}

impl RankingStrategy {
    pub fn component(name: impl Into<String>, scorer: impl ComponentScorer + 'static) -> Self {
        Self {
            name: name.into(),
            kind: StrategyKind::Component(Arc::new(scorer)),
        }
    }

    pub fn pairwise(name: impl Into<String>, scorer: impl PairScorer + 'static) -> Self {
        Self {
            name: name.into(),
            kind: StrategyKind::Pairwise(Arc::new(scorer)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scores every candidate and returns them in ranking order.
    pub fn rank(&self, query: &QueryConceptModel, documents: &[Arc<DocumentGraph>]) -> Vec<ScoredDocument> {
        let start = Instant::now();

        let scores = match &self.kind {
            StrategyKind::Component(scorer) => {
                let raw: Vec<Vec<f64>> = documents
                    .iter()
                    .map(|doc| {
                        query
                            .components
                            .iter()
                            .map(|c| scorer.score_component(doc, &c.concepts))
                            .collect()
                    })
                    .collect();
                let weight = query.components.first().map_or(0.0, |c| c.weight);
                combine_component_scores(weight, &raw)
            }
            StrategyKind::Pairwise(scorer) => {
                let pairs = query.component_pairs();
                let raw: Vec<Vec<f64>> = documents
                    .iter()
                    .map(|doc| {
                        pairs
                            .iter()
                            .map(|&(i, j)| {
                                scorer.score_pair(doc, &query.components[i].concepts, &query.components[j].concepts)
                            })
                            .collect()
                    })
                    .collect();
                combine_pair_scores(query.component_count(), &pairs, &raw)
            }
        };

        let mut ranking: Vec<ScoredDocument> = documents
            .iter()
            .zip(scores)
            .map(|(doc, score)| ScoredDocument::new(doc.document_id(), score))
            .collect();
        sort_ranking(&mut ranking);

        debug!(
            "Strategy {} ranked {} documents for topic {} in {:?}",
            self.name,
            ranking.len(),
            query.topic_id,
            start.elapsed()
        );
        ranking
    }
}


fn column_maxima(width: usize, raw: &[Vec<f64>]) -> Vec<f64> {
    let mut maxima = vec![0.0_f64; width];
    for row in raw {
        for (max, &score) in maxima.iter_mut().zip(row) {
            *max = max.max(score);
        }
    }
    maxima
}


/// `raw[d][i]` is document `d`'s score for component `i`. Normalized scores
/// are summed first and scaled by the shared component weight once, so a
/// document holding every maximum lands on exactly `n * weight`.
pub fn combine_component_scores(weight: f64, raw: &[Vec<f64>]) -> Vec<f64> {
    let width = raw.first().map_or(0, Vec::len);
    let maxima = column_maxima(width, raw);
    raw.iter()
        .map(|row| {
            let total: f64 = row
                .iter()
                .zip(&maxima)
                .filter(|(_, max)| **max != 0.0)
                .map(|(score, max)| score / max)
                .sum();
            total * weight
        })
        .collect()
}


/// `raw[d][k]` is document `d`'s score for component pair `pairs[k]`.
pub fn combine_pair_scores(components: usize, pairs: &[(usize, usize)], raw: &[Vec<f64>]) -> Vec<f64> {
    if pairs.is_empty() {
        return vec![0.0; raw.len()];
    }

    let mut maxima = vec![0.0_f64; components];
    for row in raw {
        for (&(i, j), &score) in pairs.iter().zip(row) {
            maxima[i] = maxima[i].max(score);
            maxima[j] = maxima[j].max(score);
        }
    }

    let pair_weight = 1.0 / pairs.len() as f64;
    raw.iter()
        .map(|row| {
            let total: f64 = pairs
                .iter()
                .zip(row)
                .map(|(&(i, j), &score)| {
                    let mut normalized = 0.0;
                    if maxima[i] != 0.0 {
                        normalized += score / maxima[i];
                    }
                    if maxima[j] != 0.0 {
                        normalized += score / maxima[j];
                    }
                    normalized / 2.0
                })
                .sum();
            total * pair_weight
        })
        .collect()
}
