use crate::error::Result;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Memoized dataset loads keyed by file path.
///
/// Entries are populated once and never invalidated; failed loads are not
/// cached so the next call retries. Frames are handed out as cheap clones
/// (polars columns are reference counted), so callers cannot mutate the
/// cached copy.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, DataFrame>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached frame for `path`, or load it with `load` and cache it.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<DataFrame>
    where
        F: FnOnce(&Path) -> Result<DataFrame>,
    {
        if let Some(df) = self.entries.get(path) {
            debug!("Load cache hit for {}", path.display());
            return Ok(df.clone());
        }

        let df = load(path)?;
        info!("Cached dataset for {}", path.display());
        self.entries.insert(path.to_path_buf(), df.clone());
        Ok(df)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
