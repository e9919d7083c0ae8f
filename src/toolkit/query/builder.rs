use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use super::models::{ConceptComponent, ConceptStrategy, QueryConceptModel, QueryTopic};
use super::resolver::{greedy_resolve, ConceptIndexAdapter};
use crate::core::error::Result;
use crate::toolkit::{ConceptId, ConceptSet};

impl QueryConceptModel {
    /// Decomposes `topic` into weighted concept components.
    ///
    /// Unresolvable alternatives contribute nothing. Index failures other than
    /// not-found abort the build.
    pub fn build(
        topic: &QueryTopic,
        index: &dyn ConceptIndexAdapter,
        strategy: ConceptStrategy,
    ) -> Result<Self> {
        let mut components = Vec::with_capacity(topic.components.len());
        let mut concept_to_score: HashMap<ConceptId, f64> = HashMap::new();
        let mut component_best: Vec<f64> = Vec::with_capacity(topic.components.len());

        for alternatives in &topic.components {
            let mut concepts = ConceptSet::new();
            let mut best = 0.0_f64;

            for alternative in alternatives {
                let resolved = greedy_resolve(index, &alternative.text, strategy)?;
                let before = concepts.len();
                for concept in resolved.into_iter().filter(|c| alternative.accepts(&c.concept_type)) {
                    best = best.max(concept.score);
                    let slot = concept_to_score.entry(concept.concept_id.clone()).or_insert(concept.score);
                    if concept.score > *slot {
                        *slot = concept.score;
                    }
                    concepts.insert(concept.concept_id);
                }
                if concepts.len() == before {
                    debug!(
                        "Alternative '{}' of topic {} added no concepts",
                        crate::truncate_for_log(&alternative.text, 40),
                        topic.topic_id
                    );
                }
            }

            let names: BTreeSet<&str> = alternatives.iter().map(|a| a.text.as_str()).collect();
            let label = names.into_iter().collect::<Vec<_>>().join(" || ");

            component_best.push(best);
            components.push(ConceptComponent {
                label,
                concepts,
                weight: 0.0,
            });
        }

        let resolvable = components.iter().any(|c| !c.is_empty());
        let weight = if resolvable { 1.0 / components.len() as f64 } else { 0.0 };
        for component in &mut components {
            component.weight = weight;
        }

        let translation_score = if strategy.is_scored() {
            component_best.iter().copied().fold(None, |acc: Option<f64>, s| {
                Some(acc.map_or(s, |a| a.min(s)))
            })
            .unwrap_or(0.0)
        } else {
            1.0
        };

        info!(
            "Built query model for topic {} ({}): {} components, {} concepts, translation score {:.3}",
            topic.topic_id,
            strategy,
            components.len(),
            concept_to_score.len(),
            translation_score
        );

        Ok(Self {
            topic_id: topic.topic_id.clone(),
            strategy,
            components,
            concept_to_score,
            translation_score,
        })
    }
}
