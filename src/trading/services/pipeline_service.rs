use serde::Serialize;
use tracing::info;

use crate::app_config::AppSettings;
use crate::error::{AppError, DataUnavailable};
use crate::trading::backtest::{backtest_signals, BacktestReport, BacktestResult};
use crate::trading::indicator::{add_basic_indicators, IndicatorTable};
use crate::trading::ml::{make_features, split_train_test, MetricsBundle};
use crate::trading::ml::baseline::{threshold_signal, train_baseline};
use crate::trading::model::Period;
use crate::trading::services::history_service::load_history;
use crate::trading::yahoo::MarketDataProvider;

pub const MIN_TRAIN_RATIO: f64 = 0.5;
pub const MAX_TRAIN_RATIO: f64 = 0.95;
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// 一次运行的输入
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub ticker: String,
    pub period: Period,
    pub train_ratio: f64,
}

impl PipelineRequest {
    pub fn new(ticker: impl Into<String>, period: Period, train_ratio: f64) -> Result<Self, AppError> {
        let request = Self {
            ticker: ticker.into().trim().to_string(),
            period,
            train_ratio,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.ticker.is_empty() {
            return Err(AppError::Config("ticker must not be empty".to_string()));
        }
        if !(MIN_TRAIN_RATIO..=MAX_TRAIN_RATIO).contains(&self.train_ratio) {
            return Err(AppError::Config(format!(
                "train ratio must lie in [{}, {}], got {}",
                MIN_TRAIN_RATIO, MAX_TRAIN_RATIO, self.train_ratio
            )));
        }
        Ok(())
    }
}

/// 一次运行的输出
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub ticker: String,
    pub period: Period,
    pub indicators: IndicatorTable,
    /// first row of the test partition within `indicators`
    pub split_idx: usize,
    pub metrics: MetricsBundle,
    pub backtest: BacktestResult,
    pub report: BacktestReport,
}

/// 加载 -> 指标 -> 特征 -> 训练 -> 回测
pub async fn run_pipeline(
    provider: &dyn MarketDataProvider,
    request: &PipelineRequest,
    settings: &AppSettings,
) -> Result<PipelineResult, AppError> {
    request.validate()?;

    let bars = load_history(provider, &request.ticker, request.period).await?;
    if bars.is_empty() {
        return Err(DataUnavailable::NoCompleteRows.into());
    }

    let indicators = add_basic_indicators(&bars)?;
    let dataset = make_features(&indicators);
    let (split_idx, train, test) = split_train_test(&dataset, request.train_ratio)?;
    info!(
        "{}: {} indicator rows, {} train / {} test",
        request.ticker,
        indicators.len(),
        train.len(),
        test.len()
    );

    let trained = train_baseline(&train, &test)?;
    let probabilities = trained.probabilities.to_vec();
    let signal = threshold_signal(&probabilities, settings.prob_threshold);

    // the validation slice keeps the final bar, which has no label
    let valid = indicators.prices()?.slice_from(split_idx);
    let backtest = backtest_signals(&valid, &signal);
    let report = BacktestReport::from_result(&backtest);
    info!(
        "{}: backtest over {} dates, total return {:.4}, max drawdown {:.4}",
        request.ticker,
        backtest.len(),
        report.total_return,
        report.max_drawdown
    );

    Ok(PipelineResult {
        ticker: request.ticker.clone(),
        period: request.period,
        indicators,
        split_idx,
        metrics: trained.metrics,
        backtest,
        report,
    })
}
