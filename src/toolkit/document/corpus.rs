

use std::collections::{BTreeSet, HashMap};

use super::models::NarrativeDocument;
use crate::toolkit::ConceptId;


pub trait CorpusStatistics: Send + Sync {
    fn idf(&self, concept: &str) -> f64;
}


/// Tag document frequencies over a fixed document collection.
#[derive(Debug, Default, Clone)]
pub struct DocumentCorpus {
    document_count: usize,
    document_frequency: HashMap<ConceptId, usize>,
}

impl DocumentCorpus {
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a NarrativeDocument>) -> Self {
        let mut corpus = Self::default();
        for document in documents {
            corpus.add_document(document);
        }
        corpus
    }

    pub fn add_document(&mut self, document: &NarrativeDocument) {
        self.document_count += 1;
        let distinct: BTreeSet<&str> = document.tags.iter().map(|t| t.concept_id.as_str()).collect();
        for concept in distinct {
            *self.document_frequency.entry(concept.to_string()).or_insert(0) += 1;
        }
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn document_frequency(&self, concept: &str) -> usize {
        self.document_frequency.get(concept).copied().unwrap_or(0)
    }
}

impl CorpusStatistics for DocumentCorpus {
    // BM25-style idf; stays positive even for concepts in every document.
    fn idf(&self, concept: &str) -> f64 {
        let n = self.document_count as f64;
        let df = self.document_frequency(concept) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}
