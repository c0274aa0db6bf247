use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use weeklybot::backtest::{BacktestEngine, ExecutionPolicy, MarketScenario, SyntheticDataGenerator};
use weeklybot::{IndicatorPipeline, PolicyComparison, SentimentScorer, Settings};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load(None).context("Failed to load settings")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║        WEEKLYBOT LOOK-AHEAD BIAS SUITE               ║");
    println!("╚═══════════════════════════════════════════════════════╝");

    let start = NaiveDate::from_ymd_opt(2021, 1, 4).context("Invalid start date")?;
    let pipeline = IndicatorPipeline::new(settings.signals.clone());
    let scorer = SentimentScorer::new(settings.sentiment.clone());

    let mut results = Vec::new();

    for scenario in MarketScenario::ALL {
        // Generate synthetic data (three years of trading days)
        let mut generator = SyntheticDataGenerator::new(42);
        let daily = generator.generate(scenario, 780, start);

        let mut weekly = pipeline.run(&daily);
        scorer.score(&mut weekly);

        let naive = BacktestEngine::new(ExecutionPolicy::SameBar).run(&weekly);
        let revised = BacktestEngine::new(ExecutionPolicy::NextBar).run(&weekly);

        naive.summary.print_report(&format!("{} / same-bar", scenario.label()));
        revised.summary.print_report(&format!("{} / next-bar", scenario.label()));

        results.push((
            scenario.label().to_string(),
            PolicyComparison::new(&naive.summary, &revised.summary),
        ));
    }

    // Summary comparison
    print_summary_comparison(&results);

    Ok(())
}

fn print_summary_comparison(results: &[(String, PolicyComparison)]) {
    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║              SCENARIO COMPARISON                      ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    println!(
        "{:<20} {:>8} {:>11} {:>8} {:>11} {:>10}",
        "Scenario", "Trades", "Same-bar%", "Trades", "Next-bar%", "Gap (pp)"
    );
    println!("{}", "─".repeat(72));

    for (name, cmp) in results {
        println!(
            "{:<20} {:>8} {:>11.2} {:>8} {:>11.2} {:>+10.2}",
            name,
            cmp.naive.total_trades,
            cmp.naive.cumulative_return * 100.0,
            cmp.revised.total_trades,
            cmp.revised.cumulative_return * 100.0,
            cmp.bias_gap * 100.0
        );
    }

    println!("\n");

    // Find largest/smallest bias
    if let Some((name, cmp)) = results
        .iter()
        .max_by(|a, b| a.1.bias_gap.total_cmp(&b.1.bias_gap))
    {
        println!("🔍 Largest bias: {} ({:+.2} pp)", name, cmp.bias_gap * 100.0);
    }

    if let Some((name, cmp)) = results
        .iter()
        .min_by(|a, b| a.1.bias_gap.total_cmp(&b.1.bias_gap))
    {
        println!("🔍 Smallest bias: {} ({:+.2} pp)", name, cmp.bias_gap * 100.0);
    }

    // Overall statistics
    let avg_gap: f64 = if !results.is_empty() {
        results.iter().map(|(_, c)| c.bias_gap).sum::<f64>() / results.len() as f64
    } else {
        0.0
    };
    let inflated = results.iter().filter(|(_, c)| c.bias_gap > 0.0).count();

    println!("\n📊 Overall Statistics:");
    println!(
        "   Scenarios where same-bar looks better: {}/{}",
        inflated,
        results.len()
    );
    println!("   Average bias gap: {:+.2} pp", avg_gap * 100.0);

    println!("\n═══════════════════════════════════════════════════════\n");
}
