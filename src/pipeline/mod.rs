// Weekly indicator pipeline
pub mod resample;
pub mod signals;

use chrono::NaiveDate;

use crate::indicators::{calculate_cmf_series, rolling_sma};
use crate::models::{DailyBar, WeeklyBar};

pub use resample::{resample_weekly, week_ending_friday};
pub use signals::{apply_signal_rules, is_buy_signal, is_sell_signal, SignalConfig};

/// Turns daily bars into the enriched weekly series.
///
/// Each week's derived columns depend only on that week and earlier
/// weeks, so the output has no look-ahead.
#[derive(Debug, Clone, Default)]
pub struct IndicatorPipeline {
    config: SignalConfig,
}

impl IndicatorPipeline {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline on bars dated on or after `start`
    pub fn run_from(&self, daily: &[DailyBar], start: NaiveDate) -> Vec<WeeklyBar> {
        let in_range: Vec<DailyBar> = daily.iter().filter(|b| b.date >= start).cloned().collect();
        self.run(&in_range)
    }

    /// Resample to weeks and compute prevHigh/prevLow, MA10, CMF and signals
    pub fn run(&self, daily: &[DailyBar]) -> Vec<WeeklyBar> {
        let mut weeks = resample_weekly(daily);
        self.enrich(&mut weeks);

        tracing::debug!(
            "Pipeline produced {} weeks from {} daily bars ({} buy / {} sell signals)",
            weeks.len(),
            daily.len(),
            weeks.iter().filter(|w| w.buy_signal).count(),
            weeks.iter().filter(|w| w.sell_signal).count()
        );

        weeks
    }

    /// Compute the derived columns in dependency order on an existing weekly series
    pub fn enrich(&self, weeks: &mut [WeeklyBar]) {
        let highs: Vec<f64> = weeks.iter().map(|w| w.high).collect();
        let lows: Vec<f64> = weeks.iter().map(|w| w.low).collect();
        let closes: Vec<f64> = weeks.iter().map(|w| w.close).collect();
        let volumes: Vec<f64> = weeks.iter().map(|w| w.volume).collect();

        let ma = rolling_sma(&closes, self.config.ma_period);
        let cmf = calculate_cmf_series(&highs, &lows, &closes, &volumes, self.config.cmf_period);

        for (i, week) in weeks.iter_mut().enumerate() {
            week.prev_high = i.checked_sub(1).map(|p| highs[p]);
            week.prev_low = i.checked_sub(1).map(|p| lows[p]);
            week.ma10 = ma[i];
            week.cmf = cmf[i];
        }

        apply_signal_rules(weeks);
    }
}
