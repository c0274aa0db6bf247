use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{slice_range, DataError, PriceSource};
use crate::models::DailyBar;

/// Reads `<data_dir>/<code>.json`, a JSON array of daily bars
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    data_dir: PathBuf,
}

impl FilePriceSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", code))
    }

    /// Write bars for `code`, replacing any existing file
    pub fn save(&self, code: &str, bars: &[DailyBar]) -> Result<(), DataError> {
        std::fs::create_dir_all(&self.data_dir)?;
        let path = self.path_for(code);
        std::fs::write(&path, serde_json::to_string_pretty(bars)?)?;
        tracing::debug!("Saved {} bars for {} to {}", bars.len(), code, path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Vec<DailyBar>, DataError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl PriceSource for FilePriceSource {
    fn daily_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError> {
        let path = self.path_for(code);
        if !path.exists() {
            tracing::warn!("No price file for {} at {}", code, path.display());
            return Err(DataError::EmptyResult {
                code: code.to_string(),
                start,
                end,
            });
        }

        let bars = self.load(&path)?;
        slice_range(code, &bars, start, end)
    }
}

/// In-memory price history keyed by code
#[derive(Debug, Clone, Default)]
pub struct MemoryPriceSource {
    bars: HashMap<String, Vec<DailyBar>>,
}

impl MemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, bars: Vec<DailyBar>) {
        self.bars.insert(code.into(), bars);
    }

    pub fn with_bars(mut self, code: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        self.insert(code, bars);
        self
    }
}

impl PriceSource for MemoryPriceSource {
    fn daily_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError> {
        let bars = self.bars.get(code).map(Vec::as_slice).unwrap_or_default();
        slice_range(code, bars, start, end)
    }
}
