

use std::sync::Arc;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::component::{OverlapMeasure, TagTfIdf};
use super::pairwise::PairMeasure;
use super::path::{PathPolicy, PathScorer, PathValue};
use super::strategy::RankingStrategy;
use crate::toolkit::document::CorpusStatistics;


/// Every concrete strategy, addressable by its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StrategyName {
    Overlap,
    StatementFrequency,
    StatementConfidence,
    DistinctStatementCount,
    DistinctStatementConfidence,
    TagFrequency,
    TagTfIdf,
    ConceptCoverage,
    Neighbourhood,

    PairCount,
    PairStatementFrequency,
    PairStatementConfidence,

    PathFrequency,
    PathLength,
    PathInverseLength,
    PathStatementCount,
    PathConfidence,

    ShortestPathLength,
    ShortestPathInverseLength,
    ShortestPathStatementCount,
    ShortestPathConfidence,
}

impl StrategyName {
    pub fn all_names() -> Vec<String> {
        Self::iter().map(|name| name.to_string()).collect()
    }

    pub fn is_path_based(&self) -> bool {
        let name: &'static str = self.into();
        name.starts_with("path_") || name.starts_with("shortest_path_")
    }

    pub fn build(&self, corpus: &Arc<dyn CorpusStatistics>) -> RankingStrategy {
        let name = self.to_string();
        let path = |policy, value| RankingStrategy::pairwise(self.to_string(), PathScorer::new(policy, value));

        match self {
            StrategyName::Overlap => RankingStrategy::component(name, OverlapMeasure::Overlap),
            StrategyName::StatementFrequency => RankingStrategy::component(name, OverlapMeasure::StatementFrequency),
            StrategyName::StatementConfidence => {
                RankingStrategy::component(name, OverlapMeasure::StatementConfidence)
            }
            StrategyName::DistinctStatementCount => {
                RankingStrategy::component(name, OverlapMeasure::DistinctStatementCount)
            }
            StrategyName::DistinctStatementConfidence => {
                RankingStrategy::component(name, OverlapMeasure::DistinctStatementConfidence)
            }
            StrategyName::TagFrequency => RankingStrategy::component(name, OverlapMeasure::TagFrequency),
            StrategyName::TagTfIdf => RankingStrategy::component(name, TagTfIdf::new(Arc::clone(corpus))),
            StrategyName::ConceptCoverage => RankingStrategy::component(name, OverlapMeasure::ConceptCoverage),
            StrategyName::Neighbourhood => RankingStrategy::component(name, OverlapMeasure::Neighbourhood),

            StrategyName::PairCount => RankingStrategy::pairwise(name, PairMeasure::PairCount),
            StrategyName::PairStatementFrequency => RankingStrategy::pairwise(name, PairMeasure::StatementFrequency),
            StrategyName::PairStatementConfidence => {
                RankingStrategy::pairwise(name, PairMeasure::StatementConfidence)
            }

            StrategyName::PathFrequency => path(PathPolicy::Iterative, PathValue::Unit),
            StrategyName::PathLength => path(PathPolicy::Iterative, PathValue::Length),
            StrategyName::PathInverseLength => path(PathPolicy::Iterative, PathValue::InverseLength),
            StrategyName::PathStatementCount => path(PathPolicy::Iterative, PathValue::StatementCount),
            StrategyName::PathConfidence => path(PathPolicy::Iterative, PathValue::ConfidenceSum),

            StrategyName::ShortestPathLength => path(PathPolicy::SingleShortest, PathValue::Length),
            StrategyName::ShortestPathInverseLength => path(PathPolicy::SingleShortest, PathValue::InverseLength),
            StrategyName::ShortestPathStatementCount => path(PathPolicy::SingleShortest, PathValue::StatementCount),
            StrategyName::ShortestPathConfidence => path(PathPolicy::SingleShortest, PathValue::ConfidenceSum),
        }
    }
}

pub fn build_strategies(names: &[StrategyName], corpus: &Arc<dyn CorpusStatistics>) -> Vec<RankingStrategy> {
    names.iter().map(|name| name.build(corpus)).collect()
}
