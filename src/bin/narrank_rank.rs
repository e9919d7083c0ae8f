

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use narrank::toolkit::ranking::ScoredDocument;
use narrank::toolkit::runfile::{entries_for_ranking, read_run_file, write_run_file, RunEntry, TopicRuns};
use narrank::toolkit::{RankingBundle, RankingPipeline};
use narrank::NarrankConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("narrank=info".parse()?)
        )
        .init();

    let config_path = std::env::var("NARRANK_CONFIG").ok().map(PathBuf::from);
    let config = NarrankConfig::load(config_path.as_deref())?;

    let bundle_path = config
        .bundle
        .clone()
        .context("No bundle configured (set `bundle` or NARRANK_BUNDLE)")?;
    let bundle = RankingBundle::load(&bundle_path)?;

    let first_stage = match &config.first_stage_run {
        Some(path) => Some(TopicRuns::from_entries(&read_run_file(path)?)),
        None => None,
    };

    let pipeline = RankingPipeline::new(
        config.clone(),
        Arc::new(bundle.concept_index()),
        Arc::new(bundle.statement_store()),
        Arc::new(bundle.corpus()),
    );

    let mut raw: BTreeMap<String, Vec<RunEntry>> = BTreeMap::new();
    let mut reranked: BTreeMap<String, Vec<RunEntry>> = BTreeMap::new();
    let mut statistics = BTreeMap::new();

    for bundle_topic in &bundle.topics {
        let topic = &bundle_topic.topic;
        let candidates: Vec<ScoredDocument> = match &first_stage {
            Some(runs) => runs.ranking(&topic.topic_id).to_vec(),
            None => bundle_topic
                .candidates
                .iter()
                .map(|id| ScoredDocument::new(id.clone(), 1.0))
                .collect(),
        };
        if candidates.is_empty() {
            warn!("Topic {} has no candidates", topic.topic_id);
            continue;
        }

        let Some(ranking) = pipeline
            .rank_topic(topic, &candidates, &bundle.collection)
            .await?
        else {
            continue;
        };

        for (strategy, error) in &ranking.report.failed {
            warn!("Topic {}: strategy {} failed: {}", topic.topic_id, strategy, error);
        }
        for (strategy, scores) in &ranking.report.results {
            raw.entry(strategy.clone())
                .or_default()
                .extend(entries_for_ranking(&topic.topic_id, scores, strategy));
        }
        for (strategy, scores) in &ranking.rescaled {
            reranked
                .entry(strategy.clone())
                .or_default()
                .extend(entries_for_ranking(&topic.topic_id, scores, strategy));
        }
        statistics.insert(ranking.topic_id.clone(), ranking.statistics);
    }

    for (strategy, entries) in &raw {
        let path = config.output_dir.join(format!("{}_{}.txt", config.run_tag, strategy));
        write_run_file(&path, entries)?;
    }
    for (strategy, entries) in &reranked {
        let path = config
            .output_dir
            .join(format!("{}_{}_reranked.txt", config.run_tag, strategy));
        write_run_file(&path, entries)?;
    }

    std::fs::create_dir_all(&config.output_dir)?;
    let statistics_path = config
        .output_dir
        .join(format!("{}_statistics.json", config.run_tag));
    std::fs::write(&statistics_path, serde_json::to_string_pretty(&statistics)?)
        .with_context(|| format!("Writing {}", statistics_path.display()))?;

    let stats = pipeline.cache_stats();
    info!(
        "Ranked {} topics with {} strategies into {} (graph cache: {} hits, {} misses)",
        statistics.len(),
        raw.len(),
        config.output_dir.display(),
        stats.hits,
        stats.misses
    );
    Ok(())
}
