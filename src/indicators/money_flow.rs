//! Chaikin-style money flow
//!
//! The multiplier places the close within the bar's range:
//! +1 at the high, -1 at the low. It is undefined for a zero-range bar.
//! CMF weights the multiplier by volume over a trailing window.

use super::moving_average::rolling_sum;
use super::rolling::ratio;

/// `((close - low) - (high - close)) / (high - low)`, `None` when `high == low`
pub fn money_flow_multiplier(high: f64, low: f64, close: f64) -> Option<f64> {
    ratio((close - low) - (high - close), high - low)
}

/// CMF at every index: sum(multiplier × volume) / sum(volume) over `period` bars.
///
/// Undefined until `period` bars exist, when any multiplier in the window is
/// undefined, or when the window's total volume is zero.
pub fn calculate_cmf_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    period: usize,
) -> Vec<Option<f64>> {
    let flow_volume: Vec<Option<f64>> = highs
        .iter()
        .zip(lows)
        .zip(closes)
        .zip(volumes)
        .map(|(((&h, &l), &c), &v)| money_flow_multiplier(h, l, c).map(|m| m * v))
        .collect();
    let volume: Vec<Option<f64>> = volumes.iter().copied().map(Some).collect();

    let flow_sums = rolling_sum(&flow_volume, period);
    let volume_sums = rolling_sum(&volume, period);

    flow_sums
        .into_iter()
        .zip(volume_sums)
        .map(|(flow, vol)| ratio(flow?, vol?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_bounds() {
        assert_eq!(money_flow_multiplier(10.0, 5.0, 10.0), Some(1.0));
        assert_eq!(money_flow_multiplier(10.0, 5.0, 5.0), Some(-1.0));
        assert_eq!(money_flow_multiplier(10.0, 6.0, 8.0), Some(0.0));
    }

    #[test]
    fn test_multiplier_flat_bar_is_undefined() {
        assert_eq!(money_flow_multiplier(7.0, 7.0, 7.0), None);
    }

    #[test]
    fn test_cmf_warmup() {
        let highs = vec![10.0; 6];
        let lows = vec![5.0; 6];
        let closes = vec![10.0; 6];
        let volumes = vec![100.0; 6];

        let cmf = calculate_cmf_series(&highs, &lows, &closes, &volumes, 4);
        assert_eq!(&cmf[..3], &[None, None, None]);
        assert_eq!(cmf[3], Some(1.0));
        assert_eq!(cmf[5], Some(1.0));
    }

    #[test]
    fn test_cmf_flat_bar_poisons_its_windows_only() {
        let highs = vec![10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0];
        let lows = vec![5.0, 5.0, 10.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let closes = vec![10.0; 8];
        let volumes = vec![50.0; 8];

        let cmf = calculate_cmf_series(&highs, &lows, &closes, &volumes, 4);
        // windows ending at 3, 4, 5 include the flat bar at index 2
        assert_eq!(cmf[3], None);
        assert_eq!(cmf[5], None);
        assert_eq!(cmf[6], Some(1.0));
        assert_eq!(cmf[7], Some(1.0));
    }

    #[test]
    fn test_cmf_zero_volume_is_undefined() {
        let cmf = calculate_cmf_series(&[2.0; 4], &[1.0; 4], &[2.0; 4], &[0.0; 4], 4);
        assert_eq!(cmf[3], None);
    }

    #[test]
    fn test_cmf_mixed_pressure() {
        // two bars closing at the high, two at the low, unequal volume
        let highs = vec![10.0; 4];
        let lows = vec![0.0; 4];
        let closes = vec![10.0, 10.0, 0.0, 0.0];
        let volumes = vec![300.0, 100.0, 50.0, 50.0];

        let cmf = calculate_cmf_series(&highs, &lows, &closes, &volumes, 4);
        assert!((cmf[3].unwrap() - 0.6).abs() < 1e-12);
    }
}
