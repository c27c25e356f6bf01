use core_types::CoreError;
use dataset::SchemaError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid range: {0}")]
    Range(#[from] CoreError),

    #[error("No date range given and the dataset has no delivered orders to derive one from")]
    NoDateBounds,

    #[error("Aggregation failed: {0}")]
    Frame(String),
}

// `PolarsError` is neither `Clone` nor `Eq`, so only its message is kept.
impl From<PolarsError> for AnalyticsError {
    fn from(err: PolarsError) -> Self {
        AnalyticsError::Frame(err.to_string())
    }
}
