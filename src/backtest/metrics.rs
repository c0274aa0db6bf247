use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed (or force-closed) round trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// (exit - entry) / entry
    pub trade_return: f64,
    /// Running product of (1 + return) up to and including this trade
    pub cumulative_return: f64,
    pub holding_days: i64,
    pub forced_close: bool, // Closed because the data ended
}

impl Trade {
    pub fn new(
        entry_date: NaiveDate,
        entry_price: f64,
        exit_date: NaiveDate,
        exit_price: f64,
        forced_close: bool,
    ) -> Self {
        Self {
            entry_date,
            entry_price,
            exit_date,
            exit_price,
            trade_return: (exit_price - entry_price) / entry_price,
            cumulative_return: 1.0,
            holding_days: (exit_date - entry_date).num_days(),
            forced_close,
        }
    }
}

/// Fill in `cumulative_return` for a chronological ledger
pub fn compound(trades: &mut [Trade]) {
    let mut growth = 1.0;
    for trade in trades.iter_mut() {
        growth *= 1.0 + trade.trade_return;
        trade.cumulative_return = growth;
    }
}

/// Summary statistics over one backtest's trade ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BacktestSummary {
    pub total_trades: usize,
    pub avg_return: f64,
    /// Fraction of trades with a positive return (0.0 - 1.0)
    pub win_rate: f64,
    /// Final compounded growth - 1
    pub cumulative_return: f64,

    pub winning_trades: usize,
    pub losing_trades: usize,
    pub largest_win: f64,
    pub largest_loss: f64,
    /// Worst peak-to-trough decline of the compounded equity curve (fraction)
    pub max_drawdown: f64,
    pub avg_holding_days: f64,
}

impl BacktestSummary {
    /// Calculate the summary from a compounded trade ledger
    pub fn from_trades(trades: &[Trade]) -> Self {
        let total_trades = trades.len();
        if total_trades == 0 {
            return Self::default();
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.trade_return).collect();
        let avg_return = returns.iter().sum::<f64>() / total_trades as f64;

        let winning_trades = returns.iter().filter(|&&r| r > 0.0).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate = winning_trades as f64 / total_trades as f64;

        let largest_win = returns
            .iter()
            .copied()
            .filter(|r| *r > 0.0)
            .fold(0.0, f64::max);
        let largest_loss = returns
            .iter()
            .copied()
            .filter(|r| *r <= 0.0)
            .fold(0.0, f64::min);

        let final_growth = trades.last().map(|t| t.cumulative_return).unwrap_or(1.0);
        let avg_holding_days =
            trades.iter().map(|t| t.holding_days).sum::<i64>() as f64 / total_trades as f64;

        Self {
            total_trades,
            avg_return,
            win_rate,
            cumulative_return: final_growth - 1.0,
            winning_trades,
            losing_trades,
            largest_win,
            largest_loss,
            max_drawdown: Self::calculate_drawdown(trades),
            avg_holding_days,
        }
    }

    /// Maximum drawdown of the compounded curve, starting from 1.0
    fn calculate_drawdown(trades: &[Trade]) -> f64 {
        let mut peak = 1.0_f64;
        let mut max_dd = 0.0;

        for trade in trades {
            let value = trade.cumulative_return;
            if value > peak {
                peak = value;
            }

            let drawdown = (peak - value) / peak;
            if drawdown > max_dd {
                max_dd = drawdown;
            }
        }

        max_dd
    }

    /// Print a formatted report to stdout
    pub fn print_report(&self, title: &str) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║ {:<54}║", title);
        println!("╚═══════════════════════════════════════════════════════╝\n");

        if self.total_trades == 0 {
            println!("  No trades were generated.");
            return;
        }

        println!("📈 TRADE STATISTICS");
        println!("  Total Trades:          {}", self.total_trades);
        println!(
            "  Winning Trades:        {} ({:.1}%)",
            self.winning_trades,
            self.win_rate * 100.0
        );
        println!("  Losing Trades:         {}", self.losing_trades);

        println!("\n💰 RETURNS");
        println!("  Cumulative Return:     {:+.2}%", self.cumulative_return * 100.0);
        println!("  Average Return:        {:+.2}%", self.avg_return * 100.0);
        println!("  Largest Win:           {:+.2}%", self.largest_win * 100.0);
        println!("  Largest Loss:          {:+.2}%", self.largest_loss * 100.0);
        println!("  Max Drawdown:          {:.2}%", self.max_drawdown * 100.0);
        println!(
            "  Avg Holding Period:    {:.1} days ({:.1} weeks)",
            self.avg_holding_days,
            self.avg_holding_days / 7.0
        );
    }
}

/// Print a trade ledger as a table
pub fn print_ledger(trades: &[Trade]) {
    if trades.is_empty() {
        return;
    }

    println!(
        "\n  {:<12} {:>10} {:<12} {:>10} {:>9} {:>9}",
        "Entry", "Price", "Exit", "Price", "Return", "Cum."
    );
    println!("  {}", "─".repeat(67));
    for trade in trades {
        println!(
            "  {:<12} {:>10.2} {:<12} {:>10.2} {:>+8.2}% {:>9.4}{}",
            trade.entry_date,
            trade.entry_price,
            trade.exit_date,
            trade.exit_price,
            trade.trade_return * 100.0,
            trade.cumulative_return,
            if trade.forced_close { "  (open at end)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn ledger(pairs: &[(f64, f64)]) -> Vec<Trade> {
        let mut trades: Vec<Trade> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(entry, exit))| {
                let month = i as u32 + 1;
                Trade::new(ymd(month, 5), entry, ymd(month, 19), exit, false)
            })
            .collect();
        compound(&mut trades);
        trades
    }

    #[test]
    fn test_summary_round_trip() {
        let trades = ledger(&[(100.0, 110.0), (200.0, 180.0)]);
        let summary = BacktestSummary::from_trades(&trades);

        assert_eq!(summary.total_trades, 2);
        assert!(summary.avg_return.abs() < 1e-12);
        assert!((summary.cumulative_return - (-0.01)).abs() < 1e-12);
        assert_eq!(summary.win_rate, 0.5);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.losing_trades, 1);
        assert!((trades[0].cumulative_return - 1.10).abs() < 1e-12);
        assert!((trades[1].cumulative_return - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_summary_with_no_trades() {
        let summary = BacktestSummary::from_trades(&[]);

        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.avg_return, 0.0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.cumulative_return, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn test_breakeven_trade_is_not_a_win() {
        let trades = ledger(&[(50.0, 50.0), (50.0, 55.0)]);
        let summary = BacktestSummary::from_trades(&trades);

        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.win_rate, 0.5);
    }

    #[test]
    fn test_drawdown_calculation() {
        // 1.0 → 1.2 → 0.9 → 0.99
        let trades = ledger(&[(100.0, 120.0), (100.0, 75.0), (100.0, 110.0)]);
        let summary = BacktestSummary::from_trades(&trades);

        assert!((summary.max_drawdown - 0.25).abs() < 1e-12);
        assert!((summary.largest_win - 0.20).abs() < 1e-12);
        assert!((summary.largest_loss + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_holding_days() {
        let trade = Trade::new(ymd(1, 5), 10.0, ymd(2, 2), 11.0, true);
        assert_eq!(trade.holding_days, 28);
        assert!(trade.forced_close);
    }
}
