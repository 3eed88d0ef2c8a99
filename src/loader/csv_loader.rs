use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Rows sampled by the reader when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Read a CSV file (header row required) into a DataFrame, inferring column
/// types from content.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let df = parse_csv(bytes).map_err(|source| DashboardError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded dataset {} with {} rows and {} columns",
        path.display(),
        df.height(),
        df.width()
    );

    Ok(df)
}

fn parse_csv(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}
