// Core modules
pub mod analysis;
pub mod backtest;
pub mod config;
pub mod data;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod sentiment;

// Re-export commonly used types
pub use analysis::{run_analysis, AnalysisReport, AnalysisRequest, PolicyComparison};
pub use backtest::{BacktestEngine, BacktestRun, BacktestSummary, ExecutionPolicy, Trade};
pub use config::Settings;
pub use data::{DataError, InstrumentCatalog, PriceSource};
pub use models::*;
pub use pipeline::IndicatorPipeline;
pub use sentiment::SentimentScorer;
