

pub mod core;
pub mod toolkit;
pub mod utils;

pub use utils::truncate_for_log;


pub use crate::core::config::NarrankConfig;
pub use crate::core::error::{NarrankError, Result};
pub use toolkit::{ConceptId, ConceptSet};


pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.0;


pub const DEFAULT_MIN_TRANSLATION_SCORE: f64 = 0.9;


pub const DEFAULT_MIN_COMPONENTS: usize = 2;


pub const DEFAULT_BAND_OFFSET: f64 = 0.01;


pub const DEFAULT_GRAPH_CACHE_SIZE: usize = 1024;
