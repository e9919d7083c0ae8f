

pub mod builder;
pub mod models;
pub mod resolver;
pub mod statistics;

pub use models::{AlternativeSpec, ConceptComponent, ConceptStrategy, QueryConceptModel, QueryTopic};
pub use resolver::{
    greedy_resolve, normalize_text, ConceptEntry, ConceptIndexAdapter, ConceptLookupError, LookupMode,
    ResolvedConcept, StaticConceptIndex,
};
pub use statistics::QueryStatistics;
