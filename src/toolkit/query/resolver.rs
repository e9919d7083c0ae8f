

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::models::ConceptStrategy;
use crate::toolkit::ConceptId;


lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[\[\]()?!]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}


#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConceptLookupError {

    #[error("No concept matches '{0}'")]
    NotFound(String),


    #[error("Concept index unavailable: {0}")]
    Unavailable(String),
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    Exact,
    Prefix,
    Scored,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConcept {
    pub concept_id: ConceptId,
    #[serde(default)]
    pub concept_type: String,
    #[serde(default = "default_score")]
    pub score: f64,
}

fn default_score() -> f64 {
    1.0
}

impl ResolvedConcept {
    pub fn new(concept_id: impl Into<ConceptId>, concept_type: impl Into<String>, score: f64) -> Self {
        Self {
            concept_id: concept_id.into(),
            concept_type: concept_type.into(),
            score,
        }
    }
}


/// Resolves free text to concept identifiers. Unmatched text must be
/// reported as [`ConceptLookupError::NotFound`], never as an empty list.
pub trait ConceptIndexAdapter: Send + Sync {
    fn resolve(&self, text: &str, mode: LookupMode) -> Result<Vec<ResolvedConcept>, ConceptLookupError>;
}


pub fn normalize_text(text: &str) -> String {
    let cleaned = PUNCTUATION.replace_all(text, " ");
    WHITESPACE.replace_all(cleaned.trim(), " ").to_lowercase()
}


/// In-memory dictionary index from surface strings to concepts.
#[derive(Debug, Default, Clone)]
pub struct StaticConceptIndex {
    entries: BTreeMap<String, Vec<ResolvedConcept>>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptEntry {
    pub text: String,
    #[serde(flatten)]
    pub concept: ResolvedConcept,
}

impl StaticConceptIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ConceptEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(&entry.text, entry.concept);
        }
        index
    }

    pub fn insert(&mut self, text: &str, concept: ResolvedConcept) {
        self.entries.entry(normalize_text(text)).or_default().push(concept);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prefix_matches<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a Vec<ResolvedConcept>)> + 'a {
        self.entries
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
    }
}

impl ConceptIndexAdapter for StaticConceptIndex {
    fn resolve(&self, text: &str, mode: LookupMode) -> Result<Vec<ResolvedConcept>, ConceptLookupError> {
        let key = normalize_text(text);
        if key.is_empty() {
            return Err(ConceptLookupError::NotFound(text.to_string()));
        }

        let found: Vec<ResolvedConcept> = match mode {
            LookupMode::Exact => self.entries.get(&key).cloned().unwrap_or_default(),
            LookupMode::Prefix | LookupMode::Scored => {
                let query_len = key.chars().count() as f64;
                let mut best: HashMap<ConceptId, ResolvedConcept> = HashMap::new();
                for (entry_text, concepts) in self.prefix_matches(&key) {
                    // Scored lookups discount partial matches by covered length
                    let coverage = if mode == LookupMode::Scored {
                        query_len / entry_text.chars().count() as f64
                    } else {
                        1.0
                    };
                    for concept in concepts {
                        let score = concept.score * coverage;
                        let slot = best
                            .entry(concept.concept_id.clone())
                            .or_insert_with(|| ResolvedConcept { score, ..concept.clone() });
                        if score > slot.score {
                            slot.score = score;
                        }
                    }
                }
                let mut found: Vec<ResolvedConcept> = best.into_values().collect();
                found.sort_by(|a, b| a.concept_id.cmp(&b.concept_id));
                found
            }
        };

        if found.is_empty() {
            Err(ConceptLookupError::NotFound(text.to_string()))
        } else {
            Ok(found)
        }
    }
}


fn find_with_strategy(
    index: &dyn ConceptIndexAdapter,
    text: &str,
    strategy: ConceptStrategy,
) -> Result<Vec<ResolvedConcept>, ConceptLookupError> {
    match strategy {
        ConceptStrategy::Exact => index.resolve(text, LookupMode::Exact),
        ConceptStrategy::Expanded => index.resolve(text, LookupMode::Prefix),
        ConceptStrategy::Scored => index.resolve(text, LookupMode::Scored),
        ConceptStrategy::Hybrid => match index.resolve(text, LookupMode::Exact) {
            Err(ConceptLookupError::NotFound(_)) => index.resolve(text, LookupMode::Prefix),
            other => other,
        },
    }
}


/// Resolves `text`, falling back to sub-phrases when the whole phrase is
/// unknown. Suffixes are tried from the last word leftwards, then prefixes
/// from the first word rightwards; each pass stops at its first hit.
pub fn greedy_resolve(
    index: &dyn ConceptIndexAdapter,
    text: &str,
    strategy: ConceptStrategy,
) -> Result<Vec<ResolvedConcept>, ConceptLookupError> {
    let phrase = normalize_text(text);
    match find_with_strategy(index, &phrase, strategy) {
        Ok(found) => return Ok(found),
        Err(ConceptLookupError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let keywords: Vec<&str> = phrase.split(' ').filter(|k| !k.is_empty()).collect();
    let mut resolved = Vec::new();

    for j in (1..keywords.len()).rev() {
        let part = keywords[j..].join(" ");
        match find_with_strategy(index, &part, strategy) {
            Ok(found) => {
                debug!("Fallback suffix '{}' of '{}' resolved", part, phrase);
                resolved.extend(found);
                break;
            }
            Err(ConceptLookupError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    for j in 1..=keywords.len() {
        let part = keywords[..j].join(" ");
        match find_with_strategy(index, &part, strategy) {
            Ok(found) => {
                debug!("Fallback prefix '{}' of '{}' resolved", part, phrase);
                resolved.extend(found);
                break;
            }
            Err(ConceptLookupError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> StaticConceptIndex {
        let mut index = StaticConceptIndex::new();
        index.insert("covid 19", ResolvedConcept::new("D1", "Disease", 1.0));
        index.insert("covid", ResolvedConcept::new("D1", "Disease", 0.9));
        index.insert("metformin", ResolvedConcept::new("C1", "Drug", 1.0));
        index.insert("metformin hydrochloride", ResolvedConcept::new("C2", "Drug", 1.0));
        index.insert("diabetes", ResolvedConcept::new("D2", "Disease", 1.0));
        index
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Covid (19)?  "), "covid 19");
        assert_eq!(normalize_text("[a]!b"), "a b");
    }

    #[test]
    fn test_exact_lookup_reports_not_found() {
        let index = index();
        assert_eq!(index.resolve("Metformin", LookupMode::Exact).unwrap().len(), 1);
        assert!(matches!(
            index.resolve("metf", LookupMode::Exact),
            Err(ConceptLookupError::NotFound(_))
        ));
        assert!(index.resolve("!?", LookupMode::Exact).is_err());
    }

    #[test]
    fn test_prefix_lookup_expands() {
        let found = index().resolve("metformin", LookupMode::Prefix).unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
    }

    #[test]
    fn test_scored_lookup_discounts_partial_matches() {
        let found = index().resolve("metformin", LookupMode::Scored).unwrap();
        let c1 = found.iter().find(|c| c.concept_id == "C1").unwrap();
        let c2 = found.iter().find(|c| c.concept_id == "C2").unwrap();
        assert!((c1.score - 1.0).abs() < 1e-12);
        assert!(c2.score < 1.0);
    }

    #[test]
    fn test_hybrid_falls_back_to_prefix() {
        let index = index();
        let found = find_with_strategy(&index, "metf", ConceptStrategy::Hybrid).unwrap();
        assert_eq!(found.len(), 2);
        assert!(find_with_strategy(&index, "metf", ConceptStrategy::Exact).is_err());
    }

    #[test]
    fn test_greedy_fallback_uses_sub_phrases() {
        let index = index();
        let found = greedy_resolve(&index, "metformin in diabetes", ConceptStrategy::Exact).unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["D2", "C1"]);
    }

    #[test]
    fn test_greedy_fallback_unresolvable_is_empty() {
        let found = greedy_resolve(&index(), "unknown words here", ConceptStrategy::Exact).unwrap();
        assert!(found.is_empty());
    }

    struct BrokenIndex;

    impl ConceptIndexAdapter for BrokenIndex {
        fn resolve(&self, _text: &str, _mode: LookupMode) -> Result<Vec<ResolvedConcept>, ConceptLookupError> {
            Err(ConceptLookupError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_index_failures_propagate() {
        let result = greedy_resolve(&BrokenIndex, "covid", ConceptStrategy::Hybrid);
        assert!(matches!(result, Err(ConceptLookupError::Unavailable(_))));
    }
}
