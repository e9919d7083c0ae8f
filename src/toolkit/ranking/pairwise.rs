

use crate::toolkit::ConceptSet;
use crate::toolkit::document::DocumentGraph;


/// Scores the connection between two concept components in one document.
pub trait PairScorer: Send + Sync {
    fn score_pair(&self, doc: &DocumentGraph, lhs: &ConceptSet, rhs: &ConceptSet) -> f64;
}


/// Direct statement evidence between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMeasure {

    PairCount,

    StatementFrequency,

    StatementConfidence,
}

impl PairScorer for PairMeasure {
    fn score_pair(&self, doc: &DocumentGraph, lhs: &ConceptSet, rhs: &ConceptSet) -> f64 {
        let mut score = 0.0;
        for a in lhs.intersection(doc.nodes()) {
            for b in rhs.intersection(doc.nodes()) {
                if !doc.has_pair(a, b) {
                    continue;
                }
                score += match self {
                    PairMeasure::PairCount => 1.0,
                    PairMeasure::StatementFrequency => doc.statements_between(a, b).count() as f64,
                    PairMeasure::StatementConfidence => {
                        doc.statements_between(a, b).map(|s| s.confidence).sum()
                    }
                };
            }
        }
        score
    }
}
