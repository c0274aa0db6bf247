use serde::{Deserialize, Serialize};

use crate::models::WeeklyBar;

/// Configuration for weekly signal generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    pub ma_period: usize,  // Trend filter (MA10)
    pub cmf_period: usize, // Money flow window
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ma_period: 10,
            cmf_period: 4,
        }
    }
}

/// Breakout buy: new weekly high, close above trend, money flowing in.
///
/// Any undefined operand makes the rule false.
pub fn is_buy_signal(week: &WeeklyBar) -> bool {
    match (week.prev_high, week.ma10, week.cmf) {
        (Some(prev_high), Some(ma), Some(cmf)) => {
            week.high > prev_high && week.close > ma && cmf > 0.0
        }
        _ => false,
    }
}

/// Breakdown sell: new weekly low, close below trend, money flowing out.
///
/// Any undefined operand makes the rule false.
pub fn is_sell_signal(week: &WeeklyBar) -> bool {
    match (week.prev_low, week.ma10, week.cmf) {
        (Some(prev_low), Some(ma), Some(cmf)) => week.low < prev_low && week.close < ma && cmf < 0.0,
        _ => false,
    }
}

/// Evaluate both rules on every week. The flags are set independently.
pub fn apply_signal_rules(weeks: &mut [WeeklyBar]) {
    for week in weeks.iter_mut() {
        week.buy_signal = is_buy_signal(week);
        week.sell_signal = is_sell_signal(week);
    }
}
