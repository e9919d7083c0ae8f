

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, GraphCache};
pub use config::{FusionSettings, NarrankConfig};
pub use error::{NarrankError, Result};
