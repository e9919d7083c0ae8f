

use std::collections::HashMap;

use crate::toolkit::ranking::{ScoredDocument, StrategyRunReport};
use crate::toolkit::runfile::RunEntry;


/// Precomputed base-ranker scores: ranker -> topic -> document -> score.
#[derive(Debug, Default, Clone)]
pub struct ScoreTable {
    scores: HashMap<String, HashMap<String, HashMap<String, f64>>>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ranker: &str, topic_id: &str, document_id: &str, score: f64) {
        self.scores
            .entry(ranker.to_string())
            .or_default()
            .entry(topic_id.to_string())
            .or_default()
            .insert(document_id.to_string(), score);
    }

    pub fn add_run(&mut self, ranker: &str, entries: &[RunEntry]) {
        for entry in entries {
            self.insert(ranker, &entry.topic_id, &entry.document_id, entry.score);
        }
    }

    pub fn add_ranking(&mut self, ranker: &str, topic_id: &str, ranking: &[ScoredDocument]) {
        for doc in ranking {
            self.insert(ranker, topic_id, &doc.document_id, doc.score);
        }
    }

    pub fn add_report(&mut self, topic_id: &str, report: &StrategyRunReport) {
        for (ranker, ranking) in &report.results {
            self.add_ranking(ranker, topic_id, ranking);
        }
    }

    pub fn get(&self, ranker: &str, topic_id: &str, document_id: &str) -> Option<f64> {
        self.scores
            .get(ranker)?
            .get(topic_id)?
            .get(document_id)
            .copied()
    }

    pub fn contains_ranker(&self, ranker: &str) -> bool {
        self.scores.contains_key(ranker)
    }
}
