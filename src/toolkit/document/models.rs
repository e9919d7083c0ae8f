

use serde::{Deserialize, Serialize};

use crate::toolkit::ConceptId;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementEdge {
    pub subject: ConceptId,
    pub relation: String,
    pub object: ConceptId,
    pub confidence: f64,
    #[serde(default)]
    pub sentence_id: u64,
}

impl StatementEdge {
    pub fn new(
        subject: impl Into<ConceptId>,
        relation: impl Into<String>,
        object: impl Into<ConceptId>,
        confidence: f64,
        sentence_id: u64,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
            confidence,
            sentence_id,
        }
    }

    pub fn touches(&self, concept: &str) -> bool {
        self.subject == concept || self.object == concept
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedConcept {
    pub concept_id: ConceptId,
    #[serde(default)]
    pub concept_type: String,
}

impl TaggedConcept {
    pub fn new(concept_id: impl Into<ConceptId>, concept_type: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            concept_type: concept_type.into(),
        }
    }
}


/// A candidate document with its extracted statements and entity tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeDocument {
    pub document_id: String,
    #[serde(default)]
    pub statements: Vec<StatementEdge>,
    #[serde(default)]
    pub tags: Vec<TaggedConcept>,
}
