use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of a dashboard run. Unparseable cell values are not errors,
/// they become nulls during cleaning.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Cannot read dataset file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset file {path} is not valid CSV: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Column not found: {column}")]
    Schema { column: String },

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
