//! Statement multigraph of a single document.
//!
//! Statements are stored once in an edge arena; every derived index holds
//! positions into that arena. Pair and concept indices are populated in both
//! directions, so lookups treat the graph as undirected.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::models::{NarrativeDocument, StatementEdge};
use crate::toolkit::{ConceptId, ConceptSet};

#[derive(Debug, Clone)]
pub struct DocumentGraph {
    document_id: String,
    min_confidence: f64,
    edges: Vec<StatementEdge>,
    nodes: ConceptSet,
    subjects: ConceptSet,
    objects: ConceptSet,
    tag_concepts: ConceptSet,
    concept_frequency: HashMap<ConceptId, usize>,
    pair_to_statements: HashMap<ConceptId, HashMap<ConceptId, Vec<usize>>>,
    concept_to_statements: HashMap<ConceptId, Vec<usize>>,
}

impl DocumentGraph {
    /// Projects `document` at `min_confidence` (inclusive). Building again at
    /// another threshold yields a fresh graph; nothing carries over.
    pub fn build(document: &NarrativeDocument, min_confidence: f64) -> Self {
        let edges: Vec<StatementEdge> = document
            .statements
            .iter()
            .filter(|s| s.confidence >= min_confidence)
            .cloned()
            .collect();

        let mut subjects = BTreeSet::new();
        let mut objects = BTreeSet::new();
        let mut pair_to_statements: HashMap<ConceptId, HashMap<ConceptId, Vec<usize>>> = HashMap::new();
        let mut concept_to_statements: HashMap<ConceptId, Vec<usize>> = HashMap::new();

        for (idx, edge) in edges.iter().enumerate() {
            subjects.insert(edge.subject.clone());
            objects.insert(edge.object.clone());

            pair_to_statements
                .entry(edge.subject.clone())
                .or_default()
                .entry(edge.object.clone())
                .or_default()
                .push(idx);
            concept_to_statements.entry(edge.subject.clone()).or_default().push(idx);

            // a self-loop is indexed once
            if edge.subject != edge.object {
                pair_to_statements
                    .entry(edge.object.clone())
                    .or_default()
                    .entry(edge.subject.clone())
                    .or_default()
                    .push(idx);
                concept_to_statements.entry(edge.object.clone()).or_default().push(idx);
            }
        }

        let nodes: ConceptSet = subjects.union(&objects).cloned().collect();

        let mut concept_frequency: HashMap<ConceptId, usize> = HashMap::new();
        for tag in &document.tags {
            *concept_frequency.entry(tag.concept_id.clone()).or_insert(0) += 1;
        }
        let tag_concepts: ConceptSet = concept_frequency.keys().cloned().collect();

        debug!(
            "Built graph for {}: {}/{} statements at confidence >= {}, {} nodes",
            crate::truncate_for_log(&document.document_id, 16),
            edges.len(),
            document.statements.len(),
            min_confidence,
            nodes.len()
        );

        Self {
            document_id: document.document_id.clone(),
            min_confidence,
            edges,
            nodes,
            subjects,
            objects,
            tag_concepts,
            concept_frequency,
            pair_to_statements,
            concept_to_statements,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn edges(&self) -> &[StatementEdge] {
        &self.edges
    }

    pub fn nodes(&self) -> &ConceptSet {
        &self.nodes
    }

    pub fn subjects(&self) -> &ConceptSet {
        &self.subjects
    }

    pub fn objects(&self) -> &ConceptSet {
        &self.objects
    }

    /// Concepts the document was tagged with, independent of statements.
    pub fn tag_concepts(&self) -> &ConceptSet {
        &self.tag_concepts
    }

    pub fn concept_frequency(&self, concept: &str) -> usize {
        self.concept_frequency.get(concept).copied().unwrap_or(0)
    }

    pub fn length_in_concepts(&self) -> usize {
        self.concept_frequency.values().sum()
    }

    pub fn contains_node(&self, concept: &str) -> bool {
        self.nodes.contains(concept)
    }

    pub fn has_pair(&self, a: &str, b: &str) -> bool {
        self.pair_indices(a, b).is_some()
    }

    pub fn statements_between<'a>(&'a self, a: &str, b: &str) -> impl Iterator<Item = &'a StatementEdge> + 'a {
        self.pair_indices(a, b)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    pub fn statements_for<'a>(&'a self, concept: &str) -> impl Iterator<Item = &'a StatementEdge> + 'a {
        self.concept_to_statements
            .get(concept)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// Arena positions of statements touching `concept`, one entry per distinct endpoint.
    pub fn statement_indices_for(&self, concept: &str) -> &[usize] {
        self.concept_to_statements
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn pair_indices(&self, a: &str, b: &str) -> Option<&Vec<usize>> {
        self.pair_to_statements.get(a).and_then(|inner| inner.get(b))
    }
}
