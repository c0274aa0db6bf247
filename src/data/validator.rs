use serde::{Deserialize, Serialize};

use crate::models::DailyBar;

/// Counts from one cleaning pass
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Validates daily OHLCV records before they reach the pipeline
#[derive(Debug, Clone, Default)]
pub struct DailyBarValidator;

impl DailyBarValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a bar for correctness
    pub fn validate(&self, bar: &DailyBar) -> Result<(), String> {
        self.validate_prices(bar)?;
        self.validate_volume(bar)?;
        Ok(())
    }

    /// All four prices must be finite and non-zero
    fn validate_prices(&self, bar: &DailyBar) -> Result<(), String> {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("Invalid {} price: {}", field, value));
            }
        }
        Ok(())
    }

    /// Volume can be 0.0 but must be finite and non-negative
    fn validate_volume(&self, bar: &DailyBar) -> Result<(), String> {
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(format!("Invalid volume: {}", bar.volume));
        }
        Ok(())
    }

    /// Drop every invalid bar, logging each one
    pub fn clean(&self, bars: Vec<DailyBar>) -> (Vec<DailyBar>, ValidationStats) {
        let mut stats = ValidationStats::default();
        let mut kept = Vec::with_capacity(bars.len());

        for bar in bars {
            match self.validate(&bar) {
                Ok(()) => {
                    stats.accepted += 1;
                    kept.push(bar);
                }
                Err(e) => {
                    tracing::warn!("Discarding bar for {}: {}", bar.date, e);
                    stats.rejected += 1;
                }
            }
        }

        (kept, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_valid_bar() -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            open: 100.0,
            high: 102.0,
            low: 99.0,
            close: 101.0,
            volume: 1_000_000.0,
        }
    }

    #[test]
    fn test_validate_valid_bar() {
        let validator = DailyBarValidator::new();
        assert!(validator.validate(&make_valid_bar()).is_ok());
    }

    #[test]
    fn test_validate_zero_open() {
        let validator = DailyBarValidator::new();
        let mut bar = make_valid_bar();
        bar.open = 0.0;

        let result = validator.validate(&bar);
        assert!(result.unwrap_err().contains("Invalid open price"));
    }

    #[test]
    fn test_validate_nan_close() {
        let validator = DailyBarValidator::new();
        let mut bar = make_valid_bar();
        bar.close = f64::NAN;

        assert!(validator.validate(&bar).unwrap_err().contains("close"));
    }

    #[test]
    fn test_validate_zero_volume_allowed() {
        let validator = DailyBarValidator::new();
        let mut bar = make_valid_bar();
        bar.volume = 0.0;
        assert!(validator.validate(&bar).is_ok());

        bar.volume = -5.0;
        assert!(validator.validate(&bar).is_err());
    }

    #[test]
    fn test_clean_counts() {
        let validator = DailyBarValidator::new();
        let mut zero_low = make_valid_bar();
        zero_low.low = 0.0;

        let (kept, stats) = validator.clean(vec![make_valid_bar(), zero_low, make_valid_bar()]);
        assert_eq!(kept.len(), 2);
        assert_eq!(
            stats,
            ValidationStats {
                accepted: 2,
                rejected: 1
            }
        );
    }
}
