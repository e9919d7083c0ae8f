pub mod corpus;
pub mod graph;
pub mod models;
pub mod store;

pub use corpus::{CorpusStatistics, DocumentCorpus};
pub use graph::DocumentGraph;
pub use models::{NarrativeDocument, StatementEdge, TaggedConcept};
pub use store::{InMemoryStatementStore, StatementStore};
