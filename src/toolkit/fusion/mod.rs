

pub mod bands;
pub mod config;
pub mod ranker;
pub mod score_table;

pub use bands::{FirstStageBands, FirstStageScoreProvider, ScoreBand};
pub use config::FusionConfig;
pub use ranker::{ensure_unit_interval, FusionOutcome, MissingScore, WeightedFusionRanker};
pub use score_table::ScoreTable;
