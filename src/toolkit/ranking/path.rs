//! Path-based pair scoring over the undirected statement multigraph.
//!
//! Every call works on its own [`PathGraph`] built from the document's edge
//! arena, so the shared `DocumentGraph` is never mutated and strategies can
//! score the same document concurrently.

use std::collections::{HashMap, VecDeque};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

use super::pairwise::PairScorer;
use crate::toolkit::ConceptSet;
use crate::toolkit::document::DocumentGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPolicy {
    /// Repeatedly extract the shortest path and delete its edges.
    Iterative,
    /// One shortest path per concept pair, graph untouched.
    SingleShortest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathValue {
    Unit,
    Length,
    InverseLength,
    StatementCount,
    ConfidenceSum,
}

impl PathValue {
    /// `path` lists the visited concepts, so its length counts nodes.
    pub fn evaluate(&self, doc: &DocumentGraph, path: &[&str]) -> f64 {
        match self {
            PathValue::Unit => 1.0,
            PathValue::Length => path.len() as f64,
            PathValue::InverseLength => {
                if path.is_empty() {
                    0.0
                } else {
                    1.0 / path.len() as f64
                }
            }
            PathValue::StatementCount => path
                .windows(2)
                .map(|hop| doc.statements_between(hop[0], hop[1]).count() as f64)
                .sum(),
            PathValue::ConfidenceSum => path
                .windows(2)
                .flat_map(|hop| doc.statements_between(hop[0], hop[1]))
                .map(|s| s.confidence)
                .sum(),
        }
    }
}

/// Mutable working copy of a document's multigraph.
pub struct PathGraph<'a> {
    graph: StableUnGraph<&'a str, usize>,
    nodes: HashMap<&'a str, NodeIndex>,
}

impl<'a> PathGraph<'a> {
    pub fn from_document(doc: &'a DocumentGraph) -> Self {
        let mut graph = StableUnGraph::default();
        let mut nodes: HashMap<&'a str, NodeIndex> = HashMap::new();

        for concept in doc.nodes() {
            nodes.insert(concept.as_str(), graph.add_node(concept.as_str()));
        }
        for (idx, edge) in doc.edges().iter().enumerate() {
            if let (Some(&s), Some(&o)) = (nodes.get(edge.subject.as_str()), nodes.get(edge.object.as_str())) {
                graph.add_edge(s, o, idx);
            }
        }

        Self { graph, nodes }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Breadth-first shortest path as (visited concepts, traversed edges).
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<(Vec<&'a str>, Vec<EdgeIndex>)> {
        let start = *self.nodes.get(from)?;
        let goal = *self.nodes.get(to)?;
        if start == goal {
            return None;
        }

        let mut predecessor: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        'search: while let Some(node) = queue.pop_front() {
            for edge in self.graph.edges(node) {
                let next = if edge.source() == node { edge.target() } else { edge.source() };
                if next == start || predecessor.contains_key(&next) {
                    continue;
                }
                predecessor.insert(next, (node, edge.id()));
                if next == goal {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        let mut concepts = vec![self.graph[goal]];
        let mut edges = Vec::new();
        let mut current = goal;
        while current != start {
            let &(prev, edge) = predecessor.get(&current)?;
            concepts.push(self.graph[prev]);
            edges.push(edge);
            current = prev;
        }
        concepts.reverse();
        edges.reverse();
        Some((concepts, edges))
    }

    pub fn remove_edges(&mut self, edges: &[EdgeIndex]) {
        for &edge in edges {
            self.graph.remove_edge(edge);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathScorer {
    pub policy: PathPolicy,
    pub value: PathValue,
}

impl PathScorer {
    pub fn new(policy: PathPolicy, value: PathValue) -> Self {
        Self { policy, value }
    }
}

impl PairScorer for PathScorer {
    fn score_pair(&self, doc: &DocumentGraph, lhs: &ConceptSet, rhs: &ConceptSet) -> f64 {
        let sources: Vec<&String> = lhs.intersection(doc.nodes()).collect();
        let targets: Vec<&String> = rhs.intersection(doc.nodes()).collect();
        if sources.is_empty() || targets.is_empty() {
            return 0.0;
        }

        let mut graph = PathGraph::from_document(doc);
        let mut score = 0.0;

        for a in &sources {
            for b in &targets {
                if a == b {
                    continue;
                }
                match self.policy {
                    PathPolicy::Iterative => {
                        while let Some((path, edges)) = graph.shortest_path(a, b) {
                            score += self.value.evaluate(doc, &path);
                            graph.remove_edges(&edges);
                        }
                    }
                    PathPolicy::SingleShortest => {
                        if let Some((path, _)) = graph.shortest_path(a, b) {
                            score += self.value.evaluate(doc, &path);
                        }
                    }
                }
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::document::{NarrativeDocument, StatementEdge};
    use proptest::prelude::*;

    fn set(ids: &[&str]) -> ConceptSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn graph(statements: Vec<StatementEdge>) -> DocumentGraph {
        DocumentGraph::build(
            &NarrativeDocument {
                document_id: "d".to_string(),
                statements,
                tags: Vec::new(),
            },
            0.0,
        )
    }

    // a-b directly twice, and a-x-b
    fn diamond() -> DocumentGraph {
        graph(vec![
            StatementEdge::new("a", "r", "b", 0.5, 0),
            StatementEdge::new("b", "r", "a", 0.25, 1),
            StatementEdge::new("a", "r", "x", 1.0, 2),
            StatementEdge::new("x", "r", "b", 1.0, 3),
        ])
    }

    #[test]
    fn test_shortest_path_counts_nodes() {
        let doc = diamond();
        let graph = PathGraph::from_document(&doc);
        assert_eq!(graph.edge_count(), 4);
        let (path, edges) = graph.shortest_path("a", "b").unwrap();
        assert_eq!(path, vec!["a", "b"]);
        assert_eq!(edges.len(), 1);
        assert!(graph.shortest_path("a", "missing").is_none());
    }

    #[test]
    fn test_iterative_extracts_edge_disjoint_paths() {
        let doc = diamond();
        let (a, b) = (set(&["a"]), set(&["b"]));

        let unit = PathScorer::new(PathPolicy::Iterative, PathValue::Unit);
        assert_eq!(unit.score_pair(&doc, &a, &b), 3.0);

        let length = PathScorer::new(PathPolicy::Iterative, PathValue::Length);
        assert_eq!(length.score_pair(&doc, &a, &b), 2.0 + 2.0 + 3.0);

        let inverse = PathScorer::new(PathPolicy::Iterative, PathValue::InverseLength);
        assert!((inverse.score_pair(&doc, &a, &b) - (0.5 + 0.5 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_single_shortest_does_not_mutate() {
        let doc = diamond();
        let scorer = PathScorer::new(PathPolicy::SingleShortest, PathValue::StatementCount);
        // the direct hop carries both parallel statements
        assert_eq!(scorer.score_pair(&doc, &set(&["a"]), &set(&["b"])), 2.0);

        let confidence = PathScorer::new(PathPolicy::SingleShortest, PathValue::ConfidenceSum);
        assert!((confidence.score_pair(&doc, &set(&["a"]), &set(&["b"])) - 0.75).abs() < 1e-12);
        assert_eq!(doc.edges().len(), 4);
    }

    #[test]
    fn test_disconnected_and_self_pairs_score_zero() {
        let doc = graph(vec![
            StatementEdge::new("a", "r", "b", 0.5, 0),
            StatementEdge::new("c", "r", "d", 0.5, 1),
        ]);
        let scorer = PathScorer::new(PathPolicy::Iterative, PathValue::Unit);
        assert_eq!(scorer.score_pair(&doc, &set(&["a"]), &set(&["c"])), 0.0);
        assert_eq!(scorer.score_pair(&doc, &set(&["a"]), &set(&["a"])), 0.0);
        assert_eq!(scorer.score_pair(&doc, &set(&["a"]), &set(&["zz"])), 0.0);
    }

    #[test]
    fn test_removal_persists_across_concept_pairs() {
        // both target concepts are reachable only through the a-x edge
        let doc = graph(vec![
            StatementEdge::new("a", "r", "x", 0.5, 0),
            StatementEdge::new("x", "r", "b", 0.5, 1),
            StatementEdge::new("x", "r", "c", 0.5, 2),
        ]);
        let scorer = PathScorer::new(PathPolicy::Iterative, PathValue::Unit);
        assert_eq!(scorer.score_pair(&doc, &set(&["a"]), &set(&["b", "c"])), 1.0);
    }

    #[test]
    fn test_iterative_extraction_is_not_monotone() {
        // the short a-x-y-b path blocks both longer routes once extracted
        let detours = vec![
            StatementEdge::new("x", "r", "r1", 0.5, 1),
            StatementEdge::new("r1", "r", "r2", 0.5, 1),
            StatementEdge::new("r2", "r", "b", 0.5, 1),
            StatementEdge::new("a", "r", "s1", 0.5, 2),
            StatementEdge::new("s1", "r", "s2", 0.5, 2),
            StatementEdge::new("s2", "r", "y", 0.5, 2),
        ];
        let mut full = vec![
            StatementEdge::new("a", "r", "x", 0.5, 0),
            StatementEdge::new("x", "r", "y", 0.5, 0),
            StatementEdge::new("y", "r", "b", 0.5, 0),
        ];
        full.extend(detours);
        let without_shortcut: Vec<StatementEdge> = full
            .iter()
            .filter(|s| !(s.subject == "x" && s.object == "y"))
            .cloned()
            .collect();

        let scorer = PathScorer::new(PathPolicy::Iterative, PathValue::Unit);
        let (a, b) = (set(&["a"]), set(&["b"]));
        assert_eq!(scorer.score_pair(&graph(full), &a, &b), 1.0);
        assert_eq!(scorer.score_pair(&graph(without_shortcut), &a, &b), 2.0);
    }

    fn edge_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..6, 0u8..6), 0..14)
    }

    fn to_graph(pairs: &[(u8, u8)]) -> DocumentGraph {
        graph(
            pairs
                .iter()
                .enumerate()
                .map(|(i, (s, o))| StatementEdge::new(format!("n{}", s), "r", format!("n{}", o), 0.5, i as u64))
                .collect(),
        )
    }

    proptest! {
        #[test]
        fn prop_shortest_path_score_never_grows_when_an_edge_is_removed(
            pairs in edge_strategy(),
            drop in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!pairs.is_empty());
            let scorer = PathScorer::new(PathPolicy::SingleShortest, PathValue::InverseLength);
            let (lhs, rhs) = (set(&["n0", "n1"]), set(&["n2", "n3"]));

            let full = scorer.score_pair(&to_graph(&pairs), &lhs, &rhs);
            let mut reduced = pairs.clone();
            reduced.remove(drop.index(pairs.len()));
            let partial = scorer.score_pair(&to_graph(&reduced), &lhs, &rhs);

            prop_assert!(partial <= full + 1e-12);
        }

        #[test]
        fn prop_path_scores_are_deterministic(pairs in edge_strategy()) {
            let scorer = PathScorer::new(PathPolicy::Iterative, PathValue::Length);
            let doc = to_graph(&pairs);
            let (lhs, rhs) = (set(&["n0", "n1"]), set(&["n4", "n5"]));
            prop_assert_eq!(scorer.score_pair(&doc, &lhs, &rhs), scorer.score_pair(&doc, &lhs, &rhs));
        }
    }
}
