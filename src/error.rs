//! Error types shared by every pipeline stage.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurveyError>;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// The input file is missing or could not be opened.
    #[error("source unavailable: {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// The table violates its structural invariants.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A categorical label with no entry in the rating scale.
    ///
    /// Never returned from a stage; rendered as a diagnostic and the cell
    /// becomes missing.
    #[error("unmapped category {label:?} in column {column} (row {row})")]
    UnmappedCategory {
        column: String,
        row: usize,
        label: String,
    },

    #[error("invalid analysis config: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
