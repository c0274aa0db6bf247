//! One analysis run: instrument name and date range in, enriched weekly
//! series plus both backtests out.
//!
//! Collaborators are passed in explicitly. Nothing here holds state between
//! runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::{BacktestEngine, BacktestRun, BacktestSummary, ExecutionPolicy};
use crate::config::Settings;
use crate::data::{DailyBarValidator, DataError, InstrumentCatalog, PriceSource, ValidationStats};
use crate::models::WeeklyBar;
use crate::pipeline::IndicatorPipeline;
use crate::sentiment::{SentimentComponents, SentimentScorer};

/// What to analyze
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisRequest {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// `end - lookback_days` through `end`
    pub fn with_lookback(name: impl Into<String>, end: NaiveDate, lookback_days: i64) -> Self {
        Self::new(name, end - chrono::Duration::days(lookback_days), end)
    }
}

/// Everything handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub name: String,
    pub code: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub validation: ValidationStats,
    /// Enriched weeks; `actual_sell_signal` carries the next-bar exits
    pub weekly: Vec<WeeklyBar>,
    pub sentiment: SentimentComponents,
    pub naive: BacktestRun,
    pub revised: BacktestRun,
}

impl AnalysisReport {
    pub fn comparison(&self) -> PolicyComparison {
        PolicyComparison::new(&self.naive.summary, &self.revised.summary)
    }

    pub fn latest_week(&self) -> Option<&WeeklyBar> {
        self.weekly.last()
    }
}

/// Same-bar vs next-bar results side by side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyComparison {
    pub naive: BacktestSummary,
    pub revised: BacktestSummary,
    /// naive cumulative return minus revised cumulative return
    pub bias_gap: f64,
}

impl PolicyComparison {
    pub fn new(naive: &BacktestSummary, revised: &BacktestSummary) -> Self {
        Self {
            naive: naive.clone(),
            revised: revised.clone(),
            bias_gap: naive.cumulative_return - revised.cumulative_return,
        }
    }

    pub fn print(&self) {
        println!("\n{:<22} {:>14} {:>14}", "", "Same-bar", "Next-bar");
        println!("{}", "─".repeat(52));
        println!(
            "{:<22} {:>14} {:>14}",
            "Trades", self.naive.total_trades, self.revised.total_trades
        );
        println!(
            "{:<22} {:>13.2}% {:>13.2}%",
            "Average return",
            self.naive.avg_return * 100.0,
            self.revised.avg_return * 100.0
        );
        println!(
            "{:<22} {:>13.1}% {:>13.1}%",
            "Win rate",
            self.naive.win_rate * 100.0,
            self.revised.win_rate * 100.0
        );
        println!(
            "{:<22} {:>13.2}% {:>13.2}%",
            "Cumulative return",
            self.naive.cumulative_return * 100.0,
            self.revised.cumulative_return * 100.0
        );
        println!(
            "\n⚖️  Look-ahead bias gap: {:+.2} percentage points",
            self.bias_gap * 100.0
        );
    }
}

/// Look up, fetch, clean, enrich, score and backtest one instrument.
///
/// `NotFound` and `EmptyResult` reject the whole run. A range whose bars
/// are all discarded by validation also counts as `EmptyResult`.
pub fn run_analysis<C, P>(
    catalog: &C,
    source: &P,
    request: &AnalysisRequest,
    settings: &Settings,
) -> Result<AnalysisReport, DataError>
where
    C: InstrumentCatalog + ?Sized,
    P: PriceSource + ?Sized,
{
    let code = catalog.lookup_code(&request.name)?;
    tracing::info!(
        "Analyzing {} ({}) from {} to {}",
        request.name,
        code,
        request.start,
        request.end
    );

    let raw = source.daily_bars(&code, request.start, request.end)?;
    let (daily, validation) = DailyBarValidator::new().clean(raw);
    if daily.is_empty() {
        return Err(DataError::EmptyResult {
            code,
            start: request.start,
            end: request.end,
        });
    }

    let pipeline = IndicatorPipeline::new(settings.signals.clone());
    let mut weekly = pipeline.run_from(&daily, request.start);

    let scorer = SentimentScorer::new(settings.sentiment.clone());
    let sentiment = scorer.score(&mut weekly);

    let naive = BacktestEngine::new(ExecutionPolicy::SameBar).run(&weekly);
    let revised = BacktestEngine::new(ExecutionPolicy::NextBar).run(&weekly);
    for (week, exited) in weekly.iter_mut().zip(&revised.exit_flags) {
        week.actual_sell_signal = *exited;
    }

    tracing::info!(
        "{}: {} weeks, {} rejected bars, bias gap {:+.2}%",
        request.name,
        weekly.len(),
        validation.rejected,
        (naive.summary.cumulative_return - revised.summary.cumulative_return) * 100.0
    );

    Ok(AnalysisReport {
        name: request.name.clone(),
        code,
        start: request.start,
        end: request.end,
        validation,
        weekly,
        sentiment,
        naive,
        revised,
    })
}
