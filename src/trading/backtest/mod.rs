pub mod metrics;
pub mod signal_backtest;

pub use metrics::BacktestReport;
pub use signal_backtest::{backtest_signals, BacktestResult, BacktestRow};
