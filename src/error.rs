use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the user as inline messages. None of them are fatal
/// to the process; the page that hit one stops rendering its content.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("delimiter '{0}' is not a single-byte character")]
    InvalidDelimiter(char),

    #[error("column '{0}' not found (after renaming)")]
    MissingColumn(String),

    #[error("file has no climate indicator columns")]
    NoFeatureColumns,

    #[error("row {row}: '{value}' does not match date format '{format}'")]
    DateParse {
        row: usize,
        value: String,
        format: String,
    },

    #[error("row {row}, column {column}: '{value}' is not a number")]
    NumberParse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("please select both a start and an end date")]
    IncompleteRange,

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("range covers {days} days, at most {max} can be predicted at once")]
    RangeTooLong { days: usize, max: usize },

    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("feature vector has {found} values, model expects {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("feature vector contains a non-finite value at position {0}")]
    NonFiniteFeature(usize),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
