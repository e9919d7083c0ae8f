//! TREC run files: `topic \t Q0 \t document \t rank \t score \t tag`.
//!
//! Ranks are derived from list order on write and recomputed from sorted
//! order on read. Scores use the shortest representation that parses back to
//! the same `f64`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ranking::{sort_ranking, ScoredDocument};
use crate::core::error::{NarrankError, Result};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    pub topic_id: String,
    pub document_id: String,
    pub rank: usize,
    pub score: f64,
    pub tag: String,
}

impl RunEntry {
    pub fn to_line(&self) -> String {
        format!(
            "{}\tQ0\t{}\t{}\t{}\t{}",
            self.topic_id, self.document_id, self.rank, self.score, self.tag
        )
    }

    /// `line_no` is 1-based and only used for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let mut fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() != 6 {
            // some published runs are space separated
            fields = line.split_whitespace().collect();
        }
        if fields.len() < 6 {
            return Err(NarrankError::run_file(
                line_no,
                format!("expected 6 fields, found {}", fields.len()),
            ));
        }

        let rank = fields[3]
            .trim()
            .parse::<usize>()
            .map_err(|e| NarrankError::run_file(line_no, format!("invalid rank '{}': {}", fields[3], e)))?;
        let score = fields[4]
            .trim()
            .parse::<f64>()
            .map_err(|e| NarrankError::run_file(line_no, format!("invalid score '{}': {}", fields[4], e)))?;

        Ok(Self {
            topic_id: fields[0].trim().to_string(),
            document_id: fields[2].trim().to_string(),
            rank,
            score,
            tag: fields[5].trim().to_string(),
        })
    }
}


pub fn entries_for_ranking(topic_id: &str, ranking: &[ScoredDocument], tag: &str) -> Vec<RunEntry> {
    ranking
        .iter()
        .enumerate()
        .map(|(idx, doc)| RunEntry {
            topic_id: topic_id.to_string(),
            document_id: doc.document_id.clone(),
            rank: idx + 1,
            score: doc.score,
            tag: tag.to_string(),
        })
        .collect()
}

pub fn format_run(entries: &[RunEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.to_line());
        out.push('\n');
    }
    out
}

pub fn parse_run(text: &str) -> Result<Vec<RunEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| RunEntry::parse_line(line, idx + 1))
        .collect()
}

pub fn read_run_file(path: &Path) -> Result<Vec<RunEntry>> {
    let text = fs::read_to_string(path)?;
    let entries = parse_run(&text)?;
    debug!("Read {} run entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn write_run_file(path: &Path, entries: &[RunEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format_run(entries))?;
    info!("Wrote {} run entries to {}", entries.len(), path.display());
    Ok(())
}


/// Run entries grouped per topic, each list in ranking order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TopicRuns {
    topics: BTreeMap<String, Vec<ScoredDocument>>,
}

impl TopicRuns {
    pub fn from_entries(entries: &[RunEntry]) -> Self {
        let mut topics: BTreeMap<String, Vec<ScoredDocument>> = BTreeMap::new();
        for entry in entries {
            topics
                .entry(entry.topic_id.clone())
                .or_default()
                .push(ScoredDocument::new(entry.document_id.clone(), entry.score));
        }
        for ranking in topics.values_mut() {
            sort_ranking(ranking);
        }
        Self { topics }
    }

    pub fn topic_ids(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn ranking(&self, topic_id: &str) -> &[ScoredDocument] {
        self.topics.get(topic_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn to_entries(&self, tag: &str) -> Vec<RunEntry> {
        self.topics
            .iter()
            .flat_map(|(topic, ranking)| entries_for_ranking(topic, ranking, tag))
            .collect()
    }
}
