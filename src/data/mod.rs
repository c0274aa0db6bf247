// Data-fetch seams: instrument lookup and historical prices
pub mod catalog;
pub mod source;
pub mod validator;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DailyBar;

pub use catalog::{Instrument, StaticCatalog};
pub use source::{FilePriceSource, MemoryPriceSource};
pub use validator::{DailyBarValidator, ValidationStats};

/// Errors raised by the data collaborators
#[derive(Debug, Error)]
pub enum DataError {
    /// No catalog entry has exactly this name
    #[error("Instrument not found: {0}")]
    NotFound(String),
    /// The price source has no rows for the requested range
    #[error("No price data for {code} between {start} and {end}")]
    EmptyResult {
        code: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Name → code lookup over a static instrument list
pub trait InstrumentCatalog {
    /// Exact-name match; `DataError::NotFound` when nothing matches
    fn lookup_code(&self, name: &str) -> Result<String, DataError>;

    /// Every instrument name in catalog order
    fn names(&self) -> Vec<String>;
}

/// Historical daily OHLCV for one instrument
pub trait PriceSource {
    /// Bars dated within `start..=end`, oldest first.
    ///
    /// `DataError::EmptyResult` when the range yields no rows.
    fn daily_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError>;
}

/// Keep bars inside `start..=end` and fail when none remain
pub(crate) fn slice_range(
    code: &str,
    bars: &[DailyBar],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyBar>, DataError> {
    let mut in_range: Vec<DailyBar> = bars
        .iter()
        .filter(|b| b.date >= start && b.date <= end)
        .cloned()
        .collect();

    if in_range.is_empty() {
        return Err(DataError::EmptyResult {
            code: code.to_string(),
            start,
            end,
        });
    }

    in_range.sort_by_key(|b| b.date);
    Ok(in_range)
}
