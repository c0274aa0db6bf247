use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::DailyBar;

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketScenario {
    /// Steady uptrend with noise (+0.4% per trading day)
    Uptrend,
    /// Steady downtrend with noise (-0.4% per trading day)
    Downtrend,
    /// Sideways/choppy market (±1% around mean)
    Sideways,
    /// High volatility (±4% daily swings)
    Volatile,
    /// Rally for the first half, sell-off for the second
    Reversal,
    /// Missing trading days, including one fully closed week
    WithHolidays,
    /// Contains a halted week where every price is identical
    Halted,
}

impl MarketScenario {
    pub const ALL: [MarketScenario; 7] = [
        MarketScenario::Uptrend,
        MarketScenario::Downtrend,
        MarketScenario::Sideways,
        MarketScenario::Volatile,
        MarketScenario::Reversal,
        MarketScenario::WithHolidays,
        MarketScenario::Halted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MarketScenario::Uptrend => "📈 Uptrend",
            MarketScenario::Downtrend => "📉 Downtrend",
            MarketScenario::Sideways => "↔️  Sideways",
            MarketScenario::Volatile => "⚡ Volatile",
            MarketScenario::Reversal => "🔄 Reversal",
            MarketScenario::WithHolidays => "🕳️  With holidays",
            MarketScenario::Halted => "⏸️  Halted week",
        }
    }
}

/// Trading days of the closed week in `WithHolidays`
const HOLIDAY_WEEK: std::ops::Range<usize> = 40..45;
/// Trading days of the halted week in `Halted`
const HALTED_WEEK: std::ops::Range<usize> = 25..30;

/// Generates synthetic daily bars (weekdays only) for backtesting
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 50_000.0,
            base_volume: 1_000_000.0,
        }
    }

    /// Generate `num_days` trading days of bars starting on or after `start`
    ///
    /// `WithHolidays` returns fewer bars than requested: the calendar still
    /// advances over the skipped days.
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        num_days: usize,
        start: NaiveDate,
    ) -> Vec<DailyBar> {
        let dates = trading_days(start, num_days);
        let mut bars = Vec::with_capacity(num_days);
        let mut price = self.base_price;
        let mean_price = self.base_price;
        let half = num_days / 2;

        for (i, date) in dates.into_iter().enumerate() {
            let prev_close = price;

            let change = match scenario {
                MarketScenario::Uptrend => 0.004 + self.rng.gen_range(-0.01..0.01),
                MarketScenario::Downtrend => -0.004 + self.rng.gen_range(-0.01..0.01),
                MarketScenario::Sideways => {
                    // 10% pull back to the mean plus ±1% noise
                    (mean_price - price) / price * 0.1 + self.rng.gen_range(-0.01..0.01)
                }
                MarketScenario::Volatile => self.rng.gen_range(-0.04..0.04),
                MarketScenario::Reversal if i < half => 0.006 + self.rng.gen_range(-0.01..0.01),
                MarketScenario::Reversal => -0.006 + self.rng.gen_range(-0.01..0.01),
                MarketScenario::WithHolidays | MarketScenario::Halted => {
                    self.rng.gen_range(-0.01..0.01)
                }
            };

            if scenario == MarketScenario::Halted && HALTED_WEEK.contains(&i) {
                bars.push(DailyBar {
                    date,
                    open: prev_close,
                    high: prev_close,
                    low: prev_close,
                    close: prev_close,
                    volume: self.base_volume * 0.1,
                });
                continue;
            }

            price *= 1.0 + change;
            // Prevent price from going too low
            if price < self.base_price * 0.2 {
                price = self.base_price * 0.2;
            }

            let holiday = i % 17 == 16 || HOLIDAY_WEEK.contains(&i);
            if scenario == MarketScenario::WithHolidays && holiday {
                continue;
            }

            let bar = self.create_bar(date, prev_close, price);
            bars.push(bar);
        }

        bars
    }

    /// Helper to create a daily bar from the previous and current close
    fn create_bar(&mut self, date: NaiveDate, prev_close: f64, close: f64) -> DailyBar {
        let noise_pct = 0.005; // ±0.5% gap and intraday range

        let open = prev_close * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let high = open.max(close) * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = open.min(close) * (1.0 - self.rng.gen_range(0.0..noise_pct));

        // Vary volume ±30%
        let volume = (self.base_volume * self.rng.gen_range(0.7..1.3)).round();

        DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// The first `count` weekdays on or after `start`
fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut date = start;
    while days.len() < count {
        if date.weekday().num_days_from_monday() < 5 {
            days.push(date);
        }
        date += Duration::days(1);
    }
    days
}
