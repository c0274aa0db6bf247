/// Calculate Simple Moving Average (SMA) over the last `period` prices
pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let sum: f64 = prices.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// SMA at every index, aligned with `prices`.
///
/// Strict window: the first `period - 1` entries are `None`.
pub fn rolling_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| calculate_sma(&prices[..=i], period))
        .collect()
}

/// Trailing sum at every index over a strict window.
///
/// A window containing any undefined value is itself undefined.
pub fn rolling_sum(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            values[i + 1 - period..=i].iter().copied().sum()
        })
        .collect()
}
