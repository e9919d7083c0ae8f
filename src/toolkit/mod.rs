

pub mod document;
pub mod fusion;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod runfile;


pub type ConceptId = String;


pub type ConceptSet = std::collections::BTreeSet<ConceptId>;

pub use pipeline::{fuse_topic, BundleTopic, RankingBundle, RankingPipeline, TopicRanking};
