

pub mod component;
pub mod executor;
pub mod models;
pub mod pairwise;
pub mod path;
pub mod registry;
pub mod strategy;

pub use component::{ComponentScorer, OverlapMeasure, TagTfIdf};
pub use executor::{StrategyExecutor, StrategyRunReport};
pub use models::{ranking_order, sort_ranking, ScoredDocument};
pub use pairwise::{PairMeasure, PairScorer};
pub use path::{PathGraph, PathPolicy, PathScorer, PathValue};
pub use registry::{build_strategies, StrategyName};
pub use strategy::{combine_component_scores, combine_pair_scores, RankingStrategy, StrategyKind};
