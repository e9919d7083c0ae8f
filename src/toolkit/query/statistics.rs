

use std::collections::BTreeMap;
use std::sync::Arc;

use petgraph::algo::has_path_connecting;
use petgraph::graphmap::UnGraphMap;
use serde::Serialize;

use super::models::QueryConceptModel;
use crate::toolkit::document::DocumentGraph;


/// How a query's components show up in a candidate set.
///
/// Histograms are indexed by count: `components_in_documents[k]` is the
/// number of documents mentioning exactly `k` components as graph nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryStatistics {
    pub topic_id: String,
    pub documents: usize,
    pub documents_per_component: BTreeMap<String, usize>,
    pub documents_per_subject_object: BTreeMap<String, usize>,
    pub documents_per_statement: BTreeMap<String, usize>,
    pub statements_per_document: Vec<usize>,
    pub components_in_documents: Vec<usize>,
    pub connected_components_in_documents: Vec<usize>,
}

impl QueryStatistics {
    pub fn compute(query: &QueryConceptModel, documents: &[Arc<DocumentGraph>]) -> Self {
        let labels = query.labels();
        let pairs = query.component_pairs();
        let zeroed = || labels.iter().map(|l| (l.to_string(), 0)).collect::<BTreeMap<_, _>>();

        let mut stats = Self {
            topic_id: query.topic_id.clone(),
            documents: documents.len(),
            documents_per_component: zeroed(),
            documents_per_subject_object: zeroed(),
            documents_per_statement: zeroed(),
            statements_per_document: vec![0; pairs.len() + 1],
            components_in_documents: vec![0; labels.len() + 1],
            connected_components_in_documents: vec![0; pairs.len() + 1],
        };

        for doc in documents {
            for component in &query.components {
                if component.concepts.iter().any(|c| doc.concept_frequency(c) > 0) {
                    bump(&mut stats.documents_per_component, &component.label);
                }
                if component
                    .concepts
                    .iter()
                    .any(|c| doc.subjects().contains(c) || doc.objects().contains(c))
                {
                    bump(&mut stats.documents_per_subject_object, &component.label);
                }
            }

            let mut statement_pairs = 0;
            for &(i, j) in &pairs {
                let (a, b) = (&query.components[i], &query.components[j]);
                let linked = a
                    .concepts
                    .iter()
                    .any(|s| b.concepts.iter().any(|o| doc.has_pair(s, o)));
                if linked {
                    bump(&mut stats.documents_per_statement, &a.label);
                    bump(&mut stats.documents_per_statement, &b.label);
                    statement_pairs += 1;
                }
            }
            stats.statements_per_document[statement_pairs] += 1;

            let graph: UnGraphMap<&str, ()> = UnGraphMap::from_edges(
                doc.edges().iter().map(|e| (e.subject.as_str(), e.object.as_str())),
            );
            let mut connected = 0;
            for &(i, j) in &pairs {
                let found = query.components[i].concepts.iter().any(|s| {
                    graph.contains_node(s.as_str())
                        && query.components[j].concepts.iter().any(|o| {
                            graph.contains_node(o.as_str())
                                && has_path_connecting(&graph, s.as_str(), o.as_str(), None)
                        })
                });
                if found {
                    connected += 1;
                }
            }
            stats.connected_components_in_documents[connected] += 1;

            let present = query
                .components
                .iter()
                .filter(|c| c.concepts.iter().any(|concept| doc.contains_node(concept)))
                .count();
            stats.components_in_documents[present] += 1;
        }

        stats
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, label: &str) {
    if let Some(count) = counts.get_mut(label) {
        *count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::document::{NarrativeDocument, StatementEdge, TaggedConcept};
    use crate::toolkit::query::{ConceptComponent, ConceptStrategy};

    fn query() -> QueryConceptModel {
        let component = |label: &str, ids: &[&str]| ConceptComponent {
            label: label.to_string(),
            concepts: ids.iter().map(|s| s.to_string()).collect(),
            weight: 0.5,
        };
        QueryConceptModel {
            topic_id: "1".to_string(),
            strategy: ConceptStrategy::Exact,
            components: vec![component("drug", &["c1"]), component("disease", &["c3"])],
            concept_to_score: Default::default(),
            translation_score: 1.0,
        }
    }

    fn graph(id: &str, statements: Vec<StatementEdge>, tags: &[&str]) -> Arc<DocumentGraph> {
        let doc = NarrativeDocument {
            document_id: id.to_string(),
            statements,
            tags: tags.iter().map(|t| TaggedConcept::new(*t, "")).collect(),
        };
        Arc::new(DocumentGraph::build(&doc, 0.0))
    }

    #[test]
    fn test_document_statistics() {
        let docs = vec![
            graph("d1", vec![StatementEdge::new("c1", "treats", "c3", 0.9, 0)], &["c1", "c3"]),
            graph(
                "d2",
                vec![
                    StatementEdge::new("c1", "assoc", "c2", 0.9, 0),
                    StatementEdge::new("c2", "assoc", "c3", 0.9, 0),
                ],
                &["c1"],
            ),
            graph("d3", vec![StatementEdge::new("c5", "assoc", "c6", 0.9, 0)], &[]),
        ];
        let stats = QueryStatistics::compute(&query(), &docs);

        assert_eq!(stats.documents, 3);
        assert_eq!(stats.documents_per_component["drug"], 2);
        assert_eq!(stats.documents_per_component["disease"], 1);
        assert_eq!(stats.documents_per_subject_object["disease"], 2);
        assert_eq!(stats.documents_per_statement["drug"], 1);
        assert_eq!(stats.statements_per_document, vec![2, 1]);
        assert_eq!(stats.connected_components_in_documents, vec![1, 2]);
        assert_eq!(stats.components_in_documents, vec![1, 0, 2]);
    }
}
