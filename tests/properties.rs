use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashMap;

use weeklybot::*;

/// (daily change, intraday range, volume)
fn daily_steps() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    proptest::collection::vec((-0.06f64..0.06, 0.001f64..0.04, 1.0f64..1e6), 10..320)
}

/// Weekday bars with a strictly positive range and volume
fn build_bars(steps: &[(f64, f64, f64)]) -> Vec<DailyBar> {
    let mut date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut prev_close = 100.0;
    let mut bars = Vec::with_capacity(steps.len());

    for &(change, range, volume) in steps {
        while date.weekday().num_days_from_monday() >= 5 {
            date += Duration::days(1);
        }
        let open = prev_close;
        let close = prev_close * (1.0 + change);
        bars.push(DailyBar {
            date,
            open,
            high: open.max(close) * (1.0 + range),
            low: open.min(close) * (1.0 - range),
            close,
            volume,
        });
        prev_close = close;
        date += Duration::days(1);
    }
    bars
}

fn week_index(weeks: &[WeeklyBar]) -> HashMap<NaiveDate, usize> {
    weeks
        .iter()
        .enumerate()
        .map(|(i, w)| (w.week_ending, i))
        .collect()
}

proptest! {
    #[test]
    fn strict_windows_ready_after_warmup(steps in daily_steps()) {
        let weeks = IndicatorPipeline::default().run(&build_bars(&steps));
        for (i, week) in weeks.iter().enumerate() {
            prop_assert_eq!(week.ma10.is_some(), i >= 9);
            prop_assert_eq!(week.cmf.is_some(), i >= 3);
            prop_assert_eq!(week.prev_high.is_some(), i >= 1);
        }
    }

    #[test]
    fn pipeline_is_idempotent(steps in daily_steps()) {
        let bars = build_bars(&steps);
        let pipeline = IndicatorPipeline::default();

        let first = serde_json::to_string(&pipeline.run(&bars)).unwrap();
        let second = serde_json::to_string(&pipeline.run(&bars)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn one_position_at_a_time(steps in daily_steps()) {
        let weeks = IndicatorPipeline::default().run(&build_bars(&steps));

        for policy in [ExecutionPolicy::SameBar, ExecutionPolicy::NextBar] {
            let run = BacktestEngine::new(policy).run(&weeks);
            for trade in &run.trades {
                prop_assert!(trade.entry_date <= trade.exit_date);
            }
            for pair in run.trades.windows(2) {
                prop_assert!(pair[0].exit_date < pair[1].entry_date);
                prop_assert!(!pair[0].forced_close);
            }
            prop_assert_eq!(
                run.exit_flags.iter().filter(|f| **f).count(),
                run.trades.len()
            );
        }
    }

    #[test]
    fn next_bar_trails_same_bar_by_one_week(steps in daily_steps()) {
        let weeks = IndicatorPipeline::default().run(&build_bars(&steps));
        let index = week_index(&weeks);

        let naive = BacktestEngine::new(ExecutionPolicy::SameBar).run(&weeks);
        let revised = BacktestEngine::new(ExecutionPolicy::NextBar).run(&weeks);

        prop_assert!(revised.trades.len() <= naive.trades.len());
        prop_assert!(naive.trades.len() <= revised.trades.len() + 1);

        for (n, r) in naive.trades.iter().zip(&revised.trades) {
            prop_assert_eq!(index[&r.entry_date], index[&n.entry_date] + 1);
        }
    }

    #[test]
    fn fear_greed_stays_in_blend_bounds(steps in daily_steps()) {
        let mut weeks = IndicatorPipeline::default().run(&build_bars(&steps));
        SentimentScorer::default().score(&mut weeks);

        // 0.45*[-1,1.5] + 0.45*[-1,1] + 0.05*[-0.5,1.2] + 0.05*[-1.2,0.5]
        for score in weeks.iter().filter_map(|w| w.fear_greed_score) {
            prop_assert!(score >= -0.985 - 1e-9 && score <= 1.21 + 1e-9, "score {}", score);
        }
    }
}

#[test]
fn zero_trade_summary_is_all_zero() {
    let summary = BacktestSummary::from_trades(&[]);
    assert_eq!(summary.total_trades, 0);
    assert_eq!(summary.avg_return, 0.0);
    assert_eq!(summary.win_rate, 0.0);
    assert_eq!(summary.cumulative_return, 0.0);

    let run = BacktestEngine::new(ExecutionPolicy::NextBar).run(&[]);
    assert!(run.trades.is_empty());
    assert_eq!(run.summary, BacktestSummary::default());
}
