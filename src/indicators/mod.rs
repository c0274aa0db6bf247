// Technical indicators module
// Rolling-window primitives plus SMA and Chaikin money flow

pub mod money_flow;
pub mod moving_average;
pub mod rolling;

pub use money_flow::{calculate_cmf_series, money_flow_multiplier};
pub use moving_average::{calculate_sma, rolling_sma, rolling_sum};
pub use rolling::{clip, pct_change, ratio, rolling_max, rolling_mean, rolling_min, rolling_std, shift};
