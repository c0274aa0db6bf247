//! Rolling statistics over series with undefined entries.
//!
//! Every function returns a vector aligned with its input. Windows are
//! trailing and inclusive of the current index. Undefined entries inside a
//! window are skipped; a window yields a value once it holds at least
//! `min_periods` defined entries.

/// Apply `stat` to the defined values of each trailing window
fn rolling_apply<F>(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
    stat: F,
) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let min_periods = min_periods.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let defined: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if defined.len() < min_periods {
                None
            } else {
                stat(&defined)
            }
        })
        .collect()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, min_periods, |w| {
        Some(w.iter().sum::<f64>() / w.len() as f64)
    })
}

pub fn rolling_min(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, min_periods, |w| {
        w.iter().copied().reduce(f64::min)
    })
}

pub fn rolling_max(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, min_periods, |w| {
        w.iter().copied().reduce(f64::max)
    })
}

/// Sample standard deviation (n - 1 denominator); needs two defined values
pub fn rolling_std(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, min_periods.max(2), |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let variance = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    })
}

/// Value `lag` entries earlier, `None` for the first `lag` entries
pub fn shift(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| if i < lag { None } else { values[i - lag] })
        .collect()
}

/// Fractional change from the previous entry
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let prev = values[i - 1];
            ratio(values[i] - prev, prev)
        })
        .collect()
}

/// Division that is undefined for a zero denominator or a non-finite result
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

pub fn clip(value: Option<f64>, lower: f64, upper: f64) -> Option<f64> {
    value.map(|v| v.clamp(lower, upper))
}
