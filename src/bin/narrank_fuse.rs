

use std::path::PathBuf;

use anyhow::Context;
use narrank::toolkit::fuse_topic;
use narrank::toolkit::fusion::{FusionConfig, ScoreTable, WeightedFusionRanker};
use narrank::toolkit::runfile::{entries_for_ranking, read_run_file, write_run_file, TopicRuns};
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

    let settings = config
        .fusion
        .as_ref()
        .context("No fusion section configured")?;
    let fusion = FusionConfig::from_settings(settings, config.weight_tolerance)?;
    let first_stage_path = config
        .first_stage_run
        .as_ref()
        .context("Fusion needs a first-stage run (set `first_stage_run`)")?;
    let first_stage = TopicRuns::from_entries(&read_run_file(first_stage_path)?);

    let mut table = ScoreTable::new();
    for ranker in fusion.ranker_names() {
        let path = config.output_dir.join(format!("{}_{}.txt", config.run_tag, ranker));
        let entries = read_run_file(&path).with_context(|| format!("Reading base run {}", path.display()))?;
        info!("Loaded {} scores for {}", entries.len(), ranker);
        table.add_run(ranker, &entries);
    }

    let ranker = WeightedFusionRanker::new(fusion);
    let label = ranker.name();

    let mut entries = Vec::new();
    for topic_id in first_stage.topic_ids() {
        let candidates = first_stage.ranking(topic_id);
        if candidates.is_empty() {
            warn!("Topic {} has no first-stage candidates", topic_id);
            continue;
        }
        let fused = fuse_topic(&ranker, topic_id, candidates, &table, config.band_offset)?;
        entries.extend(entries_for_ranking(topic_id, &fused, &label));
    }

    let path = config.output_dir.join(format!("{}_{}.txt", config.run_tag, label));
    write_run_file(&path, &entries)?;
    info!("Wrote {} fused entries to {}", entries.len(), path.display());
    Ok(())
}
