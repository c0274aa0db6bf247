use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One calendar week (ending Friday) aggregated from daily bars,
/// plus the indicator columns derived from it.
///
/// Derived fields are `None` until enough history exists for their window,
/// or when the underlying arithmetic is degenerate (e.g. `high == low`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyBar {
    /// The Friday that ends this week
    pub week_ending: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Number of daily bars that went into this week
    pub trading_days: usize,

    pub prev_high: Option<f64>,
    pub prev_low: Option<f64>,
    pub ma10: Option<f64>,
    pub cmf: Option<f64>,
    pub buy_signal: bool,
    pub sell_signal: bool,
    pub fear_greed_score: Option<f64>,
    /// Set on the week where the next-bar backtest actually exited
    pub actual_sell_signal: bool,
}

impl WeeklyBar {
    /// Start a week from its first daily bar
    pub fn open_week(week_ending: NaiveDate, first: &DailyBar) -> Self {
        Self {
            week_ending,
            open: first.open,
            high: first.high,
            low: first.low,
            close: first.close,
            volume: first.volume,
            trading_days: 1,
            prev_high: None,
            prev_low: None,
            ma10: None,
            cmf: None,
            buy_signal: false,
            sell_signal: false,
            fear_greed_score: None,
            actual_sell_signal: false,
        }
    }

    /// Fold a later daily bar of the same week into this one
    pub fn absorb(&mut self, bar: &DailyBar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
        self.trading_days += 1;
    }

    /// Signals that fired on this week. Buy and sell are evaluated
    /// independently, so both can be present.
    pub fn signals(&self) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.buy_signal {
            signals.push(Signal {
                date: self.week_ending,
                kind: SignalKind::Buy,
            });
        }
        if self.sell_signal {
            signals.push(Signal {
                date: self.week_ending,
                kind: SignalKind::Sell,
            });
        }
        signals
    }
}

/// Trading signal direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
}

/// A signal attached to the week it fired on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signal {
    pub date: NaiveDate,
    pub kind: SignalKind,
}

/// Collect every signal in a weekly series, in chronological order
pub fn collect_signals(weeks: &[WeeklyBar]) -> Vec<Signal> {
    weeks.iter().flat_map(WeeklyBar::signals).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, open: f64, high: f64, low: f64, close: f64, volume: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn test_week_aggregation() {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut week = WeeklyBar::open_week(friday, &day(2, 10.0, 12.0, 9.0, 11.0, 100.0));
        week.absorb(&day(3, 11.0, 15.0, 10.0, 14.0, 200.0));
        week.absorb(&day(4, 14.0, 14.5, 8.0, 9.5, 50.0));

        assert_eq!(week.open, 10.0);
        assert_eq!(week.high, 15.0);
        assert_eq!(week.low, 8.0);
        assert_eq!(week.close, 9.5);
        assert_eq!(week.volume, 350.0);
        assert_eq!(week.trading_days, 3);
    }

    #[test]
    fn test_both_signals_on_one_week() {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut week = WeeklyBar::open_week(friday, &day(2, 10.0, 12.0, 9.0, 11.0, 100.0));
        week.buy_signal = true;
        week.sell_signal = true;

        let signals = week.signals();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].kind, SignalKind::Buy);
        assert_eq!(signals[1].kind, SignalKind::Sell);
    }
}
