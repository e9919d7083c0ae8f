//! Per-component scoring functions.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::toolkit::ConceptSet;
use crate::toolkit::document::{CorpusStatistics, DocumentGraph};

/// Scores one concept component against one document. Must be pure and
/// return a non-negative value.
pub trait ComponentScorer: Send + Sync {
    fn score_component(&self, doc: &DocumentGraph, concepts: &ConceptSet) -> f64;
}

impl<F> ComponentScorer for F
where
    F: Fn(&DocumentGraph, &ConceptSet) -> f64 + Send + Sync,
{
    fn score_component(&self, doc: &DocumentGraph, concepts: &ConceptSet) -> f64 {
        self(doc, concepts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapMeasure {
    /// `|C ∩ subjects| + |C ∩ objects|`
    Overlap,
    StatementFrequency,
    StatementConfidence,
    DistinctStatementCount,
    DistinctStatementConfidence,
    TagFrequency,
    ConceptCoverage,
    Neighbourhood,
}

impl ComponentScorer for OverlapMeasure {
    fn score_component(&self, doc: &DocumentGraph, concepts: &ConceptSet) -> f64 {
        match self {
            OverlapMeasure::Overlap => {
                let subjects = concepts.intersection(doc.subjects()).count();
                let objects = concepts.intersection(doc.objects()).count();
                (subjects + objects) as f64
            }
            OverlapMeasure::StatementFrequency => concepts
                .intersection(doc.nodes())
                .map(|c| doc.statement_indices_for(c).len() as f64)
                .sum(),
            OverlapMeasure::StatementConfidence => concepts
                .intersection(doc.nodes())
                .flat_map(|c| doc.statements_for(c))
                .map(|s| s.confidence)
                .sum(),
            OverlapMeasure::DistinctStatementCount => distinct_statements(doc, concepts).len() as f64,
            OverlapMeasure::DistinctStatementConfidence => distinct_statements(doc, concepts)
                .into_iter()
                .map(|idx| doc.edges()[idx].confidence)
                .sum(),
            OverlapMeasure::TagFrequency => concepts
                .iter()
                .map(|c| doc.concept_frequency(c) as f64)
                .sum(),
            OverlapMeasure::ConceptCoverage => {
                if concepts.is_empty() {
                    0.0
                } else {
                    concepts.intersection(doc.tag_concepts()).count() as f64 / concepts.len() as f64
                }
            }
            OverlapMeasure::Neighbourhood => {
                let mut neighbours: BTreeSet<&str> = BTreeSet::new();
                for concept in concepts.intersection(doc.nodes()) {
                    for statement in doc.statements_for(concept) {
                        for end in [statement.subject.as_str(), statement.object.as_str()] {
                            if !concepts.contains(end) {
                                neighbours.insert(end);
                            }
                        }
                    }
                }
                neighbours.len() as f64
            }
        }
    }
}

fn distinct_statements(doc: &DocumentGraph, concepts: &ConceptSet) -> BTreeSet<usize> {
    concepts
        .intersection(doc.nodes())
        .flat_map(|c| doc.statement_indices_for(c).iter().copied())
        .collect()
}

/// Tag frequency weighted by corpus idf.
pub struct TagTfIdf {
    corpus: Arc<dyn CorpusStatistics>,
}

impl TagTfIdf {
    pub fn new(corpus: Arc<dyn CorpusStatistics>) -> Self {
        Self { corpus }
    }
}

impl ComponentScorer for TagTfIdf {
    fn score_component(&self, doc: &DocumentGraph, concepts: &ConceptSet) -> f64 {
        concepts
            .iter()
            .map(|c| doc.concept_frequency(c) as f64 * self.corpus.idf(c))
            .sum()
    }
}
