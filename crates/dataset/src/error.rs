use core_types::Column;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or normalizing the source extract. All are fatal.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to open data source '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the data source")]
    MissingColumn(Column),

    #[error("Line {line}: cannot parse '{value}' in column '{column}' as a timestamp")]
    InvalidTimestamp {
        column: Column,
        line: usize,
        value: String,
    },

    #[error("Line {line}: '{value}' is not a valid non-negative price")]
    InvalidPrice { line: usize, value: String },

    #[error("Line {line}: order month '{value}' is not in YYYY-MM form")]
    InvalidMonth { line: usize, value: String },
}

/// A column an operation depends on is absent from the loaded table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Required column '{column}' is not present in the dataset")]
pub struct SchemaError {
    pub column: Column,
}
