//! Fear & Greed composite score
//!
//! Blends four sub-signals, each clipped to its own band before weighting:
//! price momentum, position inside the 52-week range, volume surge and
//! volatility spike. Rolling windows here accept partial history
//! (minimum one observation), so scores appear early in the series.

use serde::{Deserialize, Serialize};

use crate::indicators::{
    clip, pct_change, ratio, rolling_max, rolling_mean, rolling_min, rolling_std, shift,
};
use crate::models::WeeklyBar;

/// Window lengths, clip bands and blend weights for the score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    pub momentum_lag: usize,     // weeks between log-price samples
    pub smoothing_short: usize,  // momentum/position smoothing
    pub smoothing_long: usize,   // volume/volatility smoothing
    pub range_window: usize,     // 52-week range
    pub recent_window: usize,    // "recent" volume/volatility
    pub baseline_window: usize,  // "normal" volume/volatility
    pub momentum_weight: f64,
    pub position_weight: f64,
    pub volume_weight: f64,
    pub volatility_weight: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            momentum_lag: 5,
            smoothing_short: 7,
            smoothing_long: 10,
            range_window: 52,
            recent_window: 5,
            baseline_window: 20,
            momentum_weight: 0.45,
            position_weight: 0.45,
            volume_weight: 0.05,
            volatility_weight: 0.05,
        }
    }
}

/// Per-week sub-scores, kept for inspection and charting
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentComponents {
    pub momentum: Vec<Option<f64>>,
    pub position: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
    pub volatility: Vec<Option<f64>>,
    pub score: Vec<Option<f64>>,
}

const MIN_PERIODS: usize = 1;

#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    config: SentimentConfig,
}

impl SentimentScorer {
    pub fn new(config: SentimentConfig) -> Self {
        Self { config }
    }

    /// Compute all sub-scores and the blended score for a weekly series
    pub fn components(&self, weeks: &[WeeklyBar]) -> SentimentComponents {
        let cfg = &self.config;
        let closes: Vec<f64> = weeks.iter().map(|w| w.close).collect();
        let close_series: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
        let volumes: Vec<Option<f64>> = weeks.iter().map(|w| Some(w.volume)).collect();

        // momentum5 = 100 × (ln close − ln close[t−lag])
        let log_close: Vec<Option<f64>> = closes
            .iter()
            .map(|&c| (c > 0.0).then(|| c.ln()))
            .collect();
        let lagged = shift(&log_close, cfg.momentum_lag);
        let momentum_raw: Vec<Option<f64>> = log_close
            .iter()
            .copied()
            .zip(lagged.iter().copied())
            .map(|(now, then)| Some((now? - then?) * 100.0))
            .collect();
        let momentum = rolling_mean(&momentum_raw, cfg.smoothing_short, MIN_PERIODS)
            .into_iter()
            .map(|m| clip(m.map(|v| v / 10.0), -1.0, 1.5))
            .collect();

        // position52W = where the close sits in its trailing range, 0..1
        let range_low = rolling_min(&close_series, cfg.range_window, MIN_PERIODS);
        let range_high = rolling_max(&close_series, cfg.range_window, MIN_PERIODS);
        let position_raw: Vec<Option<f64>> = (0..weeks.len())
            .map(|i| {
                let (low, high) = (range_low[i]?, range_high[i]?);
                clip(ratio(closes[i] - low, high - low), 0.0, 1.0)
            })
            .collect();
        let position = rolling_mean(&position_raw, cfg.smoothing_short, MIN_PERIODS)
            .into_iter()
            .map(|p| clip(p.map(|v| 2.0 * v - 1.0), -1.0, 1.5))
            .collect();

        // volumeSurge = recent average volume / baseline average volume
        let recent_volume = rolling_mean(&volumes, cfg.recent_window, MIN_PERIODS);
        let baseline_volume = rolling_mean(&volumes, cfg.baseline_window, MIN_PERIODS);
        let volume_raw = surge(&recent_volume, &baseline_volume);
        let volume = rolling_mean(&volume_raw, cfg.smoothing_long, MIN_PERIODS)
            .into_iter()
            .map(|v| clip(v.map(|s| s - 1.0), -0.5, 1.2))
            .collect();

        // volatilitySpike = recent return std / baseline return std
        let returns = pct_change(&closes);
        let recent_vol = rolling_std(&returns, cfg.recent_window, MIN_PERIODS);
        let baseline_vol = rolling_std(&returns, cfg.baseline_window, MIN_PERIODS);
        let volatility_raw = surge(&recent_vol, &baseline_vol);
        // clipped first, then negated: calm markets read as greed
        let volatility = rolling_mean(&volatility_raw, cfg.smoothing_long, MIN_PERIODS)
            .into_iter()
            .map(|v| clip(v.map(|s| s - 1.0), -0.5, 1.2).map(|s| -s))
            .collect();

        let mut components = SentimentComponents {
            momentum,
            position,
            volume,
            volatility,
            score: Vec::new(),
        };
        components.score = self.blend(&components);
        components
    }

    /// Weighted sum of the four sub-scores; undefined if any term is undefined
    fn blend(&self, c: &SentimentComponents) -> Vec<Option<f64>> {
        let cfg = &self.config;
        (0..c.momentum.len())
            .map(|i| {
                Some(
                    cfg.momentum_weight * c.momentum[i]?
                        + cfg.position_weight * c.position[i]?
                        + cfg.volume_weight * c.volume[i]?
                        + cfg.volatility_weight * c.volatility[i]?,
                )
            })
            .collect()
    }

    /// Write `fear_greed_score` into every week and return the components behind it
    pub fn score(&self, weeks: &mut [WeeklyBar]) -> SentimentComponents {
        let components = self.components(weeks);
        for (week, score) in weeks.iter_mut().zip(&components.score) {
            week.fear_greed_score = *score;
        }
        components
    }
}

/// recent / baseline, clipped to [0, 3]
fn surge(recent: &[Option<f64>], baseline: &[Option<f64>]) -> Vec<Option<f64>> {
    recent
        .iter()
        .zip(baseline)
        .map(|(r, b)| clip(ratio((*r)?, (*b)?), 0.0, 3.0))
        .collect()
}
