use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::trading::model::PriceBarSeries;

/// 单日回测结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacktestRow {
    pub date: NaiveDate,
    pub close: f64,
    /// 1 = long, 0 = flat
    pub signal: u8,
    /// close[i + 1] / close[i] - 1, zero on the last date
    pub forward_return: f64,
    pub strategy_return: f64,
    pub equity_curve: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestResult {
    rows: Vec<BacktestRow>,
}

impl BacktestResult {
    pub fn rows(&self) -> &[BacktestRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn signals(&self) -> Vec<u8> {
        self.rows.iter().map(|r| r.signal).collect()
    }

    pub fn strategy_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.strategy_return).collect()
    }

    pub fn equity_curve(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.equity_curve).collect()
    }

    /// Equity at the last date, 1.0 when there are no rows.
    pub fn final_equity(&self) -> f64 {
        self.rows.last().map(|r| r.equity_curve).unwrap_or(1.0)
    }

    pub fn tail(&self, n: usize) -> &[BacktestRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }
}

/// Truncates toward zero; only a whole 1 (or more) opens a long position.
fn coerce_signal(v: f64) -> u8 {
    if (v.trunc() as i64) >= 1 {
        1
    } else {
        0
    }
}

/// 信号对齐到价格序列
///
/// A longer signal is truncated, a shorter one is padded flat.
pub fn align_signal(len: usize, long_signal: &[f64]) -> Vec<u8> {
    if long_signal.len() != len {
        warn!(
            "signal length {} does not match {} validation dates, {}",
            long_signal.len(),
            len,
            if long_signal.len() > len { "truncating" } else { "filling the tail flat" }
        );
    }
    (0..len)
        .map(|i| long_signal.get(i).copied().map(coerce_signal).unwrap_or(0))
        .collect()
}

/// Next-day return attributed to today; the last date gets 0.
pub fn forward_returns(close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| match close.get(i + 1) {
            Some(next) => next / close[i] - 1.0,
            None => 0.0,
        })
        .collect()
}

/// 多/空仓回测
///
/// Compounds `1 + forward_return * signal` from a unit start; no fees, no
/// slippage, no leverage, no shorting.
pub fn backtest_signals(valid: &PriceBarSeries, long_signal: &[f64]) -> BacktestResult {
    let signal = align_signal(valid.len(), long_signal);
    let fwd = forward_returns(valid.close());

    let mut equity = 1.0;
    let rows = valid
        .dates()
        .iter()
        .zip(valid.close())
        .zip(signal.iter().zip(fwd.iter()))
        .map(|((&date, &close), (&s, &r))| {
            let mut strategy_return = r * s as f64;
            if strategy_return.is_nan() {
                strategy_return = 0.0;
            }
            equity *= 1.0 + strategy_return;
            BacktestRow {
                date,
                close,
                signal: s,
                forward_return: r,
                strategy_return,
                equity_curve: equity,
            }
        })
        .collect();
    BacktestResult { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn series(close: &[f64]) -> PriceBarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..close.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        PriceBarSeries::new(dates, close.to_vec(), vec![1000.0; close.len()]).unwrap()
    }

    #[test]
    fn test_coerce_signal() {
        assert_eq!(coerce_signal(1.0), 1);
        assert_eq!(coerce_signal(1.7), 1);
        assert_eq!(coerce_signal(0.9), 0);
        assert_eq!(coerce_signal(-1.0), 0);
        assert_eq!(coerce_signal(f64::NAN), 0);
    }

    #[test]
    fn test_forward_returns() {
        let r = forward_returns(&[100.0, 110.0, 99.0]);
        assert!(approx_eq!(f64, r[0], 0.1, epsilon = 1e-12));
        assert!(approx_eq!(f64, r[1], -0.1, epsilon = 1e-12));
        assert_eq!(r[2], 0.0);
    }

    #[test]
    fn test_long_every_day_tracks_price() {
        let result = backtest_signals(&series(&[100.0, 110.0, 121.0]), &[1.0, 1.0, 1.0]);
        let eq = result.equity_curve();
        assert!(approx_eq!(f64, eq[0], 1.1, epsilon = 1e-12));
        assert!(approx_eq!(f64, eq[1], 1.21, epsilon = 1e-12));
        assert!(approx_eq!(f64, eq[2], 1.21, epsilon = 1e-12));
    }

    #[test]
    fn test_empty_series() {
        let result = backtest_signals(&series(&[]), &[1.0]);
        assert!(result.is_empty());
        assert_eq!(result.final_equity(), 1.0);
    }
}
