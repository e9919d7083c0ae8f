use std::collections::HashMap;

use crate::core::error::{NarrankError, Result};

use super::models::{NarrativeDocument, StatementEdge, TaggedConcept};


/// Source of a document's extracted statements and entity tags.
pub trait StatementStore: Send + Sync {
    fn statements_for_document(&self, document_id: &str, collection: &str) -> Result<Vec<StatementEdge>>;

    fn tags_for_document(&self, _document_id: &str, _collection: &str) -> Result<Vec<TaggedConcept>> {
        Ok(Vec::new())
    }

    fn narrative_document(&self, document_id: &str, collection: &str) -> Result<NarrativeDocument> {
        Ok(NarrativeDocument {
            document_id: document_id.to_string(),
            statements: self.statements_for_document(document_id, collection)?,
            tags: self.tags_for_document(document_id, collection)?,
        })
    }

    /// Fetches every id or fails; a partially retrieved candidate set would
    /// distort the per-component maxima.
    fn narrative_documents(&self, document_ids: &[String], collection: &str) -> Result<Vec<NarrativeDocument>> {
        document_ids
            .iter()
            .map(|id| self.narrative_document(id, collection))
            .collect()
    }
}


#[derive(Debug, Default, Clone)]
pub struct InMemoryStatementStore {
    documents: HashMap<String, HashMap<String, NarrativeDocument>>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collection: impl Into<String>, document: NarrativeDocument) {
        self.documents
            .entry(collection.into())
            .or_default()
            .insert(document.document_id.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, document_id: &str, collection: &str) -> Result<&NarrativeDocument> {
        self.documents
            .get(collection)
            .and_then(|docs| docs.get(document_id))
            .ok_or_else(|| {
                NarrankError::Validation(format!(
                    "Document {} not found in collection {}",
                    document_id, collection
                ))
            })
    }
}

impl StatementStore for InMemoryStatementStore {
    fn statements_for_document(&self, document_id: &str, collection: &str) -> Result<Vec<StatementEdge>> {
        Ok(self.get(document_id, collection)?.statements.clone())
    }

    fn tags_for_document(&self, document_id: &str, collection: &str) -> Result<Vec<TaggedConcept>> {
        Ok(self.get(document_id, collection)?.tags.clone())
    }
}
