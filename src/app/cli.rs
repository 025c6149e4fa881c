use clap::Parser;

use crate::trading::model::Period;
use crate::trading::services::pipeline_service::{DEFAULT_TRAIN_RATIO, MAX_TRAIN_RATIO, MIN_TRAIN_RATIO};

/// 日线行情 + 技术指标 + 逻辑回归 + 朴素回测（仅供学习，不构成投资建议）
#[derive(Parser, Debug, Clone)]
#[command(name = "ai_stocks", version)]
pub struct Cli {
    /// Ticker symbol, e.g. AAPL or ^GSPC
    #[arg(long, default_value = "AAPL")]
    pub ticker: String,

    /// History window: 1y, 2y, 5y or 10y
    #[arg(long, default_value = "1y")]
    pub period: Period,

    /// Share of labelled rows used for training
    #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO, value_parser = parse_train_ratio)]
    pub train_ratio: f64,

    /// Rows of the indicator and backtest tables to print
    #[arg(long, default_value_t = 10)]
    pub tail: usize,

    /// Print the whole result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn parse_train_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.trim().parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (MIN_TRAIN_RATIO..=MAX_TRAIN_RATIO).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("must lie in [{}, {}]", MIN_TRAIN_RATIO, MAX_TRAIN_RATIO))
    }
}
