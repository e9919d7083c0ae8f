

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::toolkit::{ConceptId, ConceptSet};


/// How alternative strings are looked up in the concept index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConceptStrategy {

    Exact,

    Expanded,

    #[default]
    Hybrid,

    Scored,
}

impl ConceptStrategy {
    pub fn is_scored(&self) -> bool {
        matches!(self, ConceptStrategy::Scored)
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSpec {
    pub text: String,
    #[serde(default)]
    pub type_constraints: Vec<String>,
}

impl AlternativeSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            type_constraints: Vec::new(),
        }
    }

    pub fn with_types(text: impl Into<String>, types: &[&str]) -> Self {
        Self {
            text: text.into(),
            type_constraints: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn accepts(&self, concept_type: &str) -> bool {
        self.type_constraints.is_empty() || self.type_constraints.iter().any(|t| t == concept_type)
    }
}


/// A benchmark topic: AND-components, each a list of OR-alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTopic {
    pub topic_id: String,
    pub components: Vec<Vec<AlternativeSpec>>,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptComponent {
    pub label: String,
    pub concepts: ConceptSet,
    pub weight: f64,
}

impl ConceptComponent {
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConceptModel {
    pub topic_id: String,
    pub strategy: ConceptStrategy,
    pub components: Vec<ConceptComponent>,
    pub concept_to_score: HashMap<ConceptId, f64>,
    pub translation_score: f64,
}

impl QueryConceptModel {
    /// False when nothing resolved; callers skip such queries.
    pub fn is_scoreable(&self) -> bool {
        self.components.iter().any(|c| !c.is_empty())
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.label.as_str()).collect()
    }

    /// Unordered component index pairs in lexicographic order.
    pub fn component_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.components.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect()
    }
}
