

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::document::{
    CorpusStatistics, DocumentCorpus, DocumentGraph, InMemoryStatementStore, NarrativeDocument, StatementStore,
};
use super::fusion::{ensure_unit_interval, FirstStageBands, ScoreTable, WeightedFusionRanker};
use super::query::{ConceptEntry, ConceptIndexAdapter, QueryConceptModel, QueryStatistics, QueryTopic, StaticConceptIndex};
use super::ranking::{build_strategies, ScoredDocument, StrategyExecutor, StrategyRunReport};
use crate::core::cache::{CacheStats, GraphCache};
use crate::core::config::NarrankConfig;
use crate::core::error::Result;


/// Topics, their candidates, a concept dictionary and the candidate documents
/// in one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingBundle {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub concepts: Vec<ConceptEntry>,
    #[serde(default)]
    pub topics: Vec<BundleTopic>,
    #[serde(default)]
    pub documents: Vec<NarrativeDocument>,
}

fn default_collection() -> String {
    "default".to_string()
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTopic {
    #[serde(flatten)]
    pub topic: QueryTopic,
    /// Used when no first-stage run is configured; every candidate then
    /// shares the first-stage score 1.0.
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl RankingBundle {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let bundle: Self = serde_json::from_str(&text)?;
        info!(
            "Loaded bundle {}: {} topics, {} documents, {} concept entries",
            path.display(),
            bundle.topics.len(),
            bundle.documents.len(),
            bundle.concepts.len()
        );
        Ok(bundle)
    }

    pub fn concept_index(&self) -> StaticConceptIndex {
        StaticConceptIndex::from_entries(self.concepts.iter().cloned())
    }

    pub fn statement_store(&self) -> InMemoryStatementStore {
        let mut store = InMemoryStatementStore::new();
        for document in &self.documents {
            store.insert(self.collection.clone(), document.clone());
        }
        store
    }

    pub fn corpus(&self) -> DocumentCorpus {
        DocumentCorpus::from_documents(&self.documents)
    }
}


#[derive(Debug)]
pub struct TopicRanking {
    pub topic_id: String,
    pub statistics: QueryStatistics,
    pub report: StrategyRunReport,
    /// Strategy rankings mapped into the first-stage bands.
    pub rescaled: BTreeMap<String, Vec<ScoredDocument>>,
}


pub struct RankingPipeline {
    config: NarrankConfig,
    index: Arc<dyn ConceptIndexAdapter>,
    store: Arc<dyn StatementStore>,
    corpus: Arc<dyn CorpusStatistics>,
    cache: GraphCache,
    executor: StrategyExecutor,
}

impl RankingPipeline {
    pub fn new(
        config: NarrankConfig,
        index: Arc<dyn ConceptIndexAdapter>,
        store: Arc<dyn StatementStore>,
        corpus: Arc<dyn CorpusStatistics>,
    ) -> Self {
        let cache = GraphCache::new(config.graph_cache_size);
        let executor = StrategyExecutor::new(config.max_parallel_strategies);
        Self {
            config,
            index,
            store,
            corpus,
            cache,
            executor,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether a built query should be ranked at all.
    pub fn skip_reason(&self, query: &QueryConceptModel) -> Option<String> {
        if !query.is_scoreable() {
            return Some("no component resolved to a concept".to_string());
        }
        if query.component_count() < self.config.min_components {
            return Some(format!(
                "{} components, at least {} required",
                query.component_count(),
                self.config.min_components
            ));
        }
        if query.translation_score < self.config.min_translation_score {
            return Some(format!(
                "translation score {:.3} below {}",
                query.translation_score, self.config.min_translation_score
            ));
        }
        None
    }

    /// Ranks the first-stage candidates of `topic` with every configured
    /// strategy. Returns `None` for topics that are skipped.
    pub async fn rank_topic(
        &self,
        topic: &QueryTopic,
        first_stage: &[ScoredDocument],
        collection: &str,
    ) -> Result<Option<TopicRanking>> {
        let query = QueryConceptModel::build(topic, self.index.as_ref(), self.config.concept_strategy)?;
        if let Some(reason) = self.skip_reason(&query) {
            info!("Skipping topic {}: {}", topic.topic_id, reason);
            return Ok(None);
        }

        let candidate_ids: Vec<String> = first_stage.iter().map(|d| d.document_id.clone()).collect();
        let documents = self.store.narrative_documents(&candidate_ids, collection)?;
        let mut graphs: Vec<Arc<DocumentGraph>> = documents
            .iter()
            .map(|doc| self.cache.get_or_build(doc, self.config.min_confidence))
            .collect();
        graphs.sort_by(|a, b| a.document_id().cmp(b.document_id()));
        debug!("Topic {}: {} candidate graphs ready", topic.topic_id, graphs.len());

        let statistics = QueryStatistics::compute(&query, &graphs);
        let strategies = build_strategies(&self.config.strategy_names(), &self.corpus);
        let mut report = self
            .executor
            .run(Arc::new(query), Arc::new(graphs), strategies)
            .await;

        let bands = FirstStageBands::from_scores(first_stage, self.config.band_offset);
        let rescaled = rescale_report(&topic.topic_id, &bands, &mut report);

        Ok(Some(TopicRanking {
            topic_id: topic.topic_id.clone(),
            statistics,
            report,
            rescaled,
        }))
    }
}


/// Maps every strategy ranking into the first-stage bands. A strategy whose
/// ranking cannot be rescaled moves from `results` to `failed`.
fn rescale_report(
    topic_id: &str,
    bands: &FirstStageBands,
    report: &mut StrategyRunReport,
) -> BTreeMap<String, Vec<ScoredDocument>> {
    let mut rescaled = BTreeMap::new();
    let mut rejected = Vec::new();
    for (name, ranking) in &report.results {
        match bands.apply(ranking) {
            Ok(ranking) => {
                rescaled.insert(name.clone(), ranking);
            }
            Err(e) => {
                warn!("Topic {}: dropping strategy {}: {}", topic_id, name, e);
                rejected.push((name.clone(), e.to_string()));
            }
        }
    }
    for (name, error) in rejected {
        report.results.remove(&name);
        report.failed.push((name, error));
    }
    rescaled
}


/// Fuses the base rankers for one topic and maps the result into the
/// first-stage bands.
pub fn fuse_topic(
    ranker: &WeightedFusionRanker,
    topic_id: &str,
    first_stage: &[ScoredDocument],
    table: &ScoreTable,
    band_offset: f64,
) -> Result<Vec<ScoredDocument>> {
    let candidates: Vec<String> = first_stage.iter().map(|d| d.document_id.clone()).collect();
    let outcome = ranker.rank(topic_id, &candidates, table);
    if !outcome.missing.is_empty() {
        warn!(
            "Topic {}: {} fusion terms missing under {}",
            topic_id,
            outcome.missing.len(),
            ranker.name()
        );
    }
    ensure_unit_interval(&outcome.ranking)?;

    let bands = FirstStageBands::from_scores(first_stage, band_offset);
    bands.apply(&outcome.ranking)
}
