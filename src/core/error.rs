

use thiserror::Error;


#[derive(Error, Debug)]
pub enum NarrankError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Concept lookup failed: {0}")]
    ConceptLookup(#[from] crate::toolkit::query::ConceptLookupError),

    #[error("Run file error at line {line}: {message}")]
    RunFile { line: usize, message: String },

    #[error("Strategy task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

impl NarrankError {
    pub fn run_file(line: usize, message: impl Into<String>) -> Self {
        Self::RunFile {
            line,
            message: message.into(),
        }
    }
}


pub type Result<T> = std::result::Result<T, NarrankError>;
