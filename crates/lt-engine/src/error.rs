//! Engine error types.

use thiserror::Error;

/// Errors surfaced by config handling and round generation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Config failed structural validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Miss rate leaves no room for paying pulls
    #[error("miss rate must stay below 100% (got {percent}%)")]
    MissRateTooHigh { percent: f64 },

    /// Probability grid construction failed
    #[error("probability grid error: {0}")]
    Pmf(#[from] lt_math::PmfError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
