use thiserror::Error;

/// Errors raised while sourcing optimizer inputs or writing its outputs.
///
/// The optimizer itself never fails: infeasible slots come back uncovered.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid number {value:?} in {context}")]
    InvalidNumber { context: String, value: String },

    #[error("missing {0} column")]
    MissingColumn(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },
}
