pub mod engine;
pub mod metrics;
pub mod synthetic;

pub use engine::{BacktestEngine, BacktestRun, ExecutionPolicy, PositionState};
pub use metrics::{print_ledger, BacktestSummary, Trade};
pub use synthetic::{MarketScenario, SyntheticDataGenerator};
