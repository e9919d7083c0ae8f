

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::models::ScoredDocument;
use super::strategy::RankingStrategy;
use crate::core::error::NarrankError;
use crate::toolkit::document::DocumentGraph;
use crate::toolkit::query::QueryConceptModel;


#[derive(Debug, Default)]
pub struct StrategyRunReport {

    pub results: BTreeMap<String, Vec<ScoredDocument>>,

    pub failed: Vec<(String, String)>,
}

impl StrategyRunReport {

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }


    pub fn success_count(&self) -> usize {
        self.results.len()
    }


    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}


/// Runs independent strategies for one query on the blocking pool.
///
/// A failing or panicking strategy is reported in
/// [`StrategyRunReport::failed`]; the others still complete.
pub struct StrategyExecutor {

    semaphore: Arc<Semaphore>,

    max_parallel: usize,
}

impl StrategyExecutor {
    pub fn new(max_parallel: usize) -> Self {
        let max_parallel = max_parallel.max(1);
        debug!("StrategyExecutor initialized: max_parallel={}", max_parallel);

        Self {
            semaphore: Arc::new(Semaphore::new(max_parallel)),
            max_parallel,
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub async fn run(
        &self,
        query: Arc<QueryConceptModel>,
        documents: Arc<Vec<Arc<DocumentGraph>>>,
        strategies: Vec<RankingStrategy>,
    ) -> StrategyRunReport {
        let names: Vec<String> = strategies.iter().map(|s| s.name().to_string()).collect();
        let mut handles = Vec::with_capacity(strategies.len());

        for strategy in strategies {
            let semaphore = self.semaphore.clone();
            let query = query.clone();
            let documents = documents.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| NarrankError::TaskFailed(e.to_string()))?;
                let ranking = tokio::task::spawn_blocking(move || strategy.rank(&query, &documents))
                    .await
                    .map_err(|e| NarrankError::TaskFailed(format!("Task panic: {}", e)))?;
                Ok::<_, NarrankError>(ranking)
            }));
        }

        let mut report = StrategyRunReport::default();
        for (name, outcome) in names.into_iter().zip(join_all(handles).await) {
            match outcome {
                Ok(Ok(ranking)) => {
                    report.results.insert(name, ranking);
                }
                Ok(Err(e)) => {
                    warn!("Strategy {} failed for topic {}: {}", name, query.topic_id, e);
                    report.failed.push((name, e.to_string()));
                }
                Err(e) => {
                    warn!("Strategy {} aborted for topic {}: {}", name, query.topic_id, e);
                    report.failed.push((name, format!("Task panic: {}", e)));
                }
            }
        }

        info!(
            "Topic {}: {}/{} strategies completed, {} failed",
            query.topic_id,
            report.success_count(),
            report.success_count() + report.failure_count(),
            report.failure_count()
        );
        report
    }
}
