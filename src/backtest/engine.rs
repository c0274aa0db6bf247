use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::metrics::{compound, BacktestSummary, Trade};
use crate::models::WeeklyBar;

/// When a week's signal is acted on, and at which price.
///
/// Both policies share one FLAT/LONG state machine; they differ only in
/// trigger timing and the exit price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// Act on the signal's own week: enter at its open, exit at its close.
    /// Uses the close before it is known, so results carry look-ahead bias.
    SameBar,
    /// Act one week after the signal: enter and exit at that week's open.
    NextBar,
}

impl ExecutionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionPolicy::SameBar => "same-bar (look-ahead)",
            ExecutionPolicy::NextBar => "next-bar (realistic)",
        }
    }

    /// (buy, sell) triggers seen at week `i`
    fn triggers(&self, weeks: &[WeeklyBar], i: usize) -> (bool, bool) {
        match self {
            ExecutionPolicy::SameBar => (weeks[i].buy_signal, weeks[i].sell_signal),
            ExecutionPolicy::NextBar => match i.checked_sub(1) {
                Some(prev) => (weeks[prev].buy_signal, weeks[prev].sell_signal),
                None => (false, false),
            },
        }
    }

    fn entry_price(&self, week: &WeeklyBar) -> f64 {
        week.open
    }

    fn exit_price(&self, week: &WeeklyBar) -> f64 {
        match self {
            ExecutionPolicy::SameBar => week.close,
            ExecutionPolicy::NextBar => week.open,
        }
    }
}

/// Position state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionState {
    Flat,
    Long { entry_date: NaiveDate, entry_price: f64 },
}

/// Output of one backtest run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestRun {
    pub policy: ExecutionPolicy,
    pub trades: Vec<Trade>,
    pub summary: BacktestSummary,
    /// `true` on each week where a position was actually closed
    pub exit_flags: Vec<bool>,
}

/// Single-instrument, single-position weekly backtester
#[derive(Debug, Clone, Copy)]
pub struct BacktestEngine {
    policy: ExecutionPolicy,
}

impl BacktestEngine {
    pub fn new(policy: ExecutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Run the state machine over a signal-bearing weekly series.
    ///
    /// Week 0 is skipped. A buy while long and a sell while flat are
    /// ignored. A position still open after the last week is closed at the
    /// last week's exit price for this policy.
    pub fn run(&self, weeks: &[WeeklyBar]) -> BacktestRun {
        let mut state = PositionState::Flat;
        let mut trades = Vec::new();
        let mut exit_flags = vec![false; weeks.len()];

        for i in 1..weeks.len() {
            let week = &weeks[i];
            let (buy, sell) = self.policy.triggers(weeks, i);

            match state {
                PositionState::Flat if buy => {
                    let entry_price = self.policy.entry_price(week);
                    tracing::debug!(
                        "[{}] enter {} @ {:.2}",
                        self.policy.name(),
                        week.week_ending,
                        entry_price
                    );
                    state = PositionState::Long {
                        entry_date: week.week_ending,
                        entry_price,
                    };
                }
                PositionState::Long {
                    entry_date,
                    entry_price,
                } if sell => {
                    let exit_price = self.policy.exit_price(week);
                    tracing::debug!(
                        "[{}] exit {} @ {:.2}",
                        self.policy.name(),
                        week.week_ending,
                        exit_price
                    );
                    trades.push(Trade::new(
                        entry_date,
                        entry_price,
                        week.week_ending,
                        exit_price,
                        false,
                    ));
                    exit_flags[i] = true;
                    state = PositionState::Flat;
                }
                _ => {}
            }
        }

        if let (
            PositionState::Long {
                entry_date,
                entry_price,
            },
            Some(last),
        ) = (state, weeks.last())
        {
            let exit_price = self.policy.exit_price(last);
            tracing::debug!(
                "[{}] force-close {} @ {:.2}",
                self.policy.name(),
                last.week_ending,
                exit_price
            );
            trades.push(Trade::new(
                entry_date,
                entry_price,
                last.week_ending,
                exit_price,
                true,
            ));
            if let Some(flag) = exit_flags.last_mut() {
                *flag = true;
            }
        }

        compound(&mut trades);
        let summary = BacktestSummary::from_trades(&trades);

        tracing::info!(
            "Backtest [{}] complete: {} trades, cumulative {:+.2}%, win rate {:.1}%",
            self.policy.name(),
            summary.total_trades,
            summary.cumulative_return * 100.0,
            summary.win_rate * 100.0
        );

        BacktestRun {
            policy: self.policy,
            trades,
            summary,
            exit_flags,
        }
    }
}
