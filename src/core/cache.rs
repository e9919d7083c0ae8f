use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::toolkit::document::{DocumentGraph, NarrativeDocument};

type GraphKey = (String, u64);

/// Built document graphs keyed by document id and confidence threshold.
///
/// Entries are immutable `Arc`s, so a graph handed out here may be read by
/// several strategies at once.
pub struct GraphCache {
    cache: Mutex<LruCache<GraphKey, Arc<DocumentGraph>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

impl GraphCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get_or_build(&self, document: &NarrativeDocument, min_confidence: f64) -> Arc<DocumentGraph> {
        let key = (document.document_id.clone(), min_confidence.to_bits());

        {
            let mut cache = self.cache.lock();
            if let Some(graph) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(graph);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let graph = Arc::new(DocumentGraph::build(document, min_confidence));
        self.cache.lock().put(key, Arc::clone(&graph));
        graph
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };

        CacheStats {
            hits,
            misses,
            size: self.cache.lock().len(),
            hit_rate,
        }
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::document::StatementEdge;

    fn document() -> NarrativeDocument {
        NarrativeDocument {
            document_id: "d1".to_string(),
            statements: vec![
                StatementEdge::new("c1", "treats", "c2", 0.9, 1),
                StatementEdge::new("c2", "associated", "c3", 0.3, 2),
            ],
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_cache_hit_returns_same_graph() {
        let cache = GraphCache::new(4);
        let doc = document();

        let first = cache.get_or_build(&doc, 0.5);
        let second = cache.get_or_build(&doc, 0.5);

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_threshold_is_part_of_key() {
        let cache = GraphCache::new(4);
        let doc = document();

        let strict = cache.get_or_build(&doc, 0.5);
        let loose = cache.get_or_build(&doc, 0.0);

        assert_eq!(strict.edges().len(), 1);
        assert_eq!(strict.min_confidence(), 0.5);
        assert_eq!(loose.edges().len(), 2);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_clear_resets_stats() {
        let cache = GraphCache::new(1);
        let doc = document();
        cache.get_or_build(&doc, 0.0);
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.misses, 0);
    }
}
