

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{NarrankError, Result};
use crate::toolkit::query::ConceptStrategy;
use crate::toolkit::ranking::StrategyName;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionSettings {
    pub rankers: Vec<String>,
    pub weights: Vec<f64>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrankConfig {
    pub min_confidence: f64,
    pub concept_strategy: ConceptStrategy,
    pub min_translation_score: f64,
    pub min_components: usize,

    pub band_offset: f64,
    pub weight_tolerance: f64,

    pub max_parallel_strategies: usize,
    pub graph_cache_size: usize,

    pub run_tag: String,
    pub strategies: Vec<String>,
    pub bundle: Option<PathBuf>,
    pub first_stage_run: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub fusion: Option<FusionSettings>,
}

impl Default for NarrankConfig {
    fn default() -> Self {
        Self {
            min_confidence: crate::DEFAULT_MIN_CONFIDENCE,
            concept_strategy: ConceptStrategy::default(),
            min_translation_score: crate::DEFAULT_MIN_TRANSLATION_SCORE,
            min_components: crate::DEFAULT_MIN_COMPONENTS,

            band_offset: crate::DEFAULT_BAND_OFFSET,
            weight_tolerance: 0.0,

            max_parallel_strategies: 4,
            graph_cache_size: crate::DEFAULT_GRAPH_CACHE_SIZE,

            run_tag: "narrank".to_string(),
            strategies: StrategyName::all_names(),
            bundle: None,
            first_stage_run: None,
            output_dir: PathBuf::from("results"),
            fusion: None,
        }
    }
}

impl NarrankConfig {
    /// Loads defaults, then the optional file, then `NARRANK_*` environment
    /// variables (nested keys use `__`, e.g. `NARRANK_FUSION__WEIGHTS`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("NARRANK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("strategies")
                    .with_list_parse_key("fusion.rankers")
                    .with_list_parse_key("fusion.weights"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(NarrankError::Configuration(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.band_offset < 0.0 || self.weight_tolerance < 0.0 {
            return Err(NarrankError::Configuration(
                "band_offset and weight_tolerance must be non-negative".to_string(),
            ));
        }
        if self.max_parallel_strategies == 0 || self.graph_cache_size == 0 {
            return Err(NarrankError::Configuration(
                "max_parallel_strategies and graph_cache_size must be positive".to_string(),
            ));
        }
        for name in &self.strategies {
            name.parse::<StrategyName>().map_err(|_| {
                NarrankError::Configuration(format!("Unknown ranking strategy: {}", name))
            })?;
        }
        Ok(())
    }

    pub fn strategy_names(&self) -> Vec<StrategyName> {
        self.strategies
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}
