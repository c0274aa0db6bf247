use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use weeklybot::backtest::{print_ledger, MarketScenario, SyntheticDataGenerator};
use weeklybot::data::{FilePriceSource, Instrument, MemoryPriceSource, StaticCatalog};
use weeklybot::{collect_signals, run_analysis, AnalysisReport, AnalysisRequest, Settings};

const SYNTHETIC_CODE: &str = "SYNTH";
const SYNTHETIC_NAME: &str = "Synthetic";

#[derive(Parser, Debug)]
#[command(name = "weeklybot")]
#[command(about = "Weekly MA10/CMF signals with same-bar vs next-bar backtests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML settings file (default: ./weeklybot.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one instrument from the catalog
    Analyze {
        /// Exact instrument name as listed in the catalog
        #[arg(short, long)]
        name: String,
        /// First day of data (default: today minus lookback_days)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// Last day of data (default: today)
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog instruments, popular names first
    List,
    /// Analyze a generated price series
    Simulate {
        #[arg(long, value_enum, default_value_t = ScenarioArg::Reversal)]
        scenario: ScenarioArg,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of trading days to generate
        #[arg(long, default_value_t = 520)]
        days: usize,
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScenarioArg {
    Uptrend,
    Downtrend,
    Sideways,
    Volatile,
    Reversal,
    Holidays,
    Halted,
}

impl From<ScenarioArg> for MarketScenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Uptrend => MarketScenario::Uptrend,
            ScenarioArg::Downtrend => MarketScenario::Downtrend,
            ScenarioArg::Sideways => MarketScenario::Sideways,
            ScenarioArg::Volatile => MarketScenario::Volatile,
            ScenarioArg::Reversal => MarketScenario::Reversal,
            ScenarioArg::Holidays => MarketScenario::WithHolidays,
            ScenarioArg::Halted => MarketScenario::Halted,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    setup_logging(&settings.log_filter);

    match cli.command {
        Commands::Analyze {
            name,
            start,
            end,
            json,
        } => {
            let today = Local::now().date_naive();
            let end = end.unwrap_or(today);
            let request = match start {
                Some(start) => AnalysisRequest::new(name, start, end),
                None => AnalysisRequest::with_lookback(name, end, settings.lookback_days),
            };

            let catalog = load_catalog(&settings)?;
            let source = FilePriceSource::new(&settings.data_dir);
            let report = run_analysis(&catalog, &source, &request, &settings)
                .with_context(|| format!("Analysis of '{}' failed", request.name))?;

            emit(&report, json)?;
        }
        Commands::List => {
            let catalog = load_catalog(&settings)?;
            for name in catalog.selection_list(&settings.popular) {
                println!("{}", name);
            }
        }
        Commands::Simulate {
            scenario,
            seed,
            days,
            json,
        } => {
            let scenario = MarketScenario::from(scenario);
            let start = NaiveDate::from_ymd_opt(2022, 1, 3).context("Invalid start date")?;
            let bars = SyntheticDataGenerator::new(seed).generate(scenario, days, start);
            let end = bars.last().map(|b| b.date).unwrap_or(start);
            tracing::info!("Generated {} bars for {}", bars.len(), scenario.label());

            let catalog = StaticCatalog::new(vec![Instrument {
                code: SYNTHETIC_CODE.to_string(),
                name: SYNTHETIC_NAME.to_string(),
                market: None,
            }]);
            let source = MemoryPriceSource::new().with_bars(SYNTHETIC_CODE, bars);
            let request = AnalysisRequest::new(SYNTHETIC_NAME, start, end);

            let report = run_analysis(&catalog, &source, &request, &settings)
                .context("Synthetic analysis failed")?;
            emit(&report, json)?;
        }
    }

    Ok(())
}

fn setup_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_catalog(settings: &Settings) -> Result<StaticCatalog> {
    StaticCatalog::from_json_file(&settings.catalog_path).with_context(|| {
        format!(
            "Failed to load instrument catalog from {}",
            settings.catalog_path.display()
        )
    })
}

fn emit(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("\n📈 {} ({})  {} → {}", report.name, report.code, report.start, report.end);
    println!(
        "   {} weeks, {} daily bars kept, {} discarded",
        report.weekly.len(),
        report.validation.accepted,
        report.validation.rejected
    );

    if let Some(week) = report.latest_week() {
        println!("\n🗓️  Week ending {}", week.week_ending);
        println!("   Close:            {:.2}", week.close);
        println!("   MA10:             {}", fmt_opt(week.ma10, 2));
        println!("   CMF:              {}", fmt_opt(week.cmf, 3));
        println!("   Fear & Greed:     {}", fmt_opt(week.fear_greed_score, 3));
        println!(
            "   Signal:           {}",
            match (week.buy_signal, week.sell_signal) {
                (true, true) => "BUY + SELL",
                (true, false) => "BUY",
                (false, true) => "SELL",
                (false, false) => "-",
            }
        );
    }

    let signals = collect_signals(&report.weekly);
    println!("\n🔔 {} signals", signals.len());
    for signal in signals.iter().rev().take(10) {
        println!("   {}  {:?}", signal.date, signal.kind);
    }

    report.naive.summary.print_report("📉 SAME-BAR (look-ahead, unrealistic)");
    print_ledger(&report.naive.trades);

    report.revised.summary.print_report("📈 NEXT-BAR (realistic)");
    print_ledger(&report.revised.trades);

    report.comparison().print();
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}
