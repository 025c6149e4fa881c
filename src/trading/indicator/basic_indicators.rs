use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DataUnavailable, IndicatorError};
use crate::trading::indicator::pct_change::pct_change;
use crate::trading::indicator::{sma, volatility};
use crate::trading::model::PriceBarSeries;

/// Feature columns, in model order.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "Return",
    "SMA_10",
    "SMA_20",
    "Momentum_5",
    "Volatility_10",
    "Volume_Change",
];

pub const SMA_SHORT: usize = 10;
pub const SMA_LONG: usize = 20;
pub const MOMENTUM_LAG: usize = 5;
pub const VOLATILITY_WINDOW: usize = 10;

/// One bar plus its derived indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: f64,
    #[serde(rename = "Return")]
    pub ret: f64,
    #[serde(rename = "SMA_10")]
    pub sma_10: f64,
    #[serde(rename = "SMA_20")]
    pub sma_20: f64,
    #[serde(rename = "Momentum_5")]
    pub momentum_5: f64,
    #[serde(rename = "Volatility_10")]
    pub volatility_10: f64,
    #[serde(rename = "Volume_Change")]
    pub volume_change: f64,
}

impl IndicatorRow {
    /// Values in `FEATURE_COLUMNS` order.
    pub fn features(&self) -> [f64; 6] {
        [
            self.ret,
            self.sma_10,
            self.sma_20,
            self.momentum_5,
            self.volatility_10,
            self.volume_change,
        ]
    }
}

/// Bars that survived the warm-up, each with every indicator defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorTable {
    rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_rows(&self, n: usize) -> &[IndicatorRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// The price columns of the surviving rows.
    pub fn prices(&self) -> Result<PriceBarSeries, DataUnavailable> {
        let col = |f: fn(&IndicatorRow) -> Option<f64>| -> Option<Vec<f64>> {
            self.rows.iter().map(f).collect()
        };
        PriceBarSeries::new(
            self.rows.iter().map(|r| r.date).collect(),
            self.rows.iter().map(|r| r.close).collect(),
            self.rows.iter().map(|r| r.volume).collect(),
        )?
        .with_ohl(col(|r| r.open), col(|r| r.high), col(|r| r.low))
    }
}

/// 计算基础指标
///
/// Return, SMA_10, SMA_20, Momentum_5, Volatility_10 and Volume_Change for
/// every bar; bars where any of them is undefined (warm-up, `0 / 0`) are
/// dropped, so the table starts at the first bar with a full 20-bar history.
pub fn add_basic_indicators(series: &PriceBarSeries) -> Result<IndicatorTable, IndicatorError> {
    let close = series.close();
    let ret = pct_change(close, 1);
    let sma_10 = sma::calculate(close, SMA_SHORT)?;
    let sma_20 = sma::calculate(close, SMA_LONG)?;
    let momentum_5 = pct_change(close, MOMENTUM_LAG);
    let volatility_10 = volatility::rolling_std(&ret, VOLATILITY_WINDOW)?;
    let volume_change = pct_change(series.volume(), 1);

    let rows = series
        .bars()
        .enumerate()
        .filter_map(|(i, bar)| {
            Some(IndicatorRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                ret: ret[i]?,
                sma_10: sma_10[i]?,
                sma_20: sma_20[i]?,
                momentum_5: momentum_5[i]?,
                volatility_10: volatility_10[i]?,
                volume_change: volume_change[i]?,
            })
        })
        .collect();

    Ok(IndicatorTable { rows })
}
