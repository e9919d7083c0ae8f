

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document_id: String,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(document_id: impl Into<String>, score: f64) -> Self {
        Self {
            document_id: document_id.into(),
            score,
        }
    }
}


/// Score descending, then document id descending.
pub fn ranking_order(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.document_id.cmp(&a.document_id))
}

pub fn sort_ranking(ranking: &mut [ScoredDocument]) {
    ranking.sort_by(ranking_order);
}
