//! 回测性能指标

use serde::Serialize;

use crate::trading::backtest::signal_backtest::BacktestResult;

/// 回测汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacktestReport {
    pub total_return: f64,
    pub max_drawdown: f64,
    /// daily, not annualised
    pub sharpe: f64,
    /// share of dates spent long
    pub exposure: f64,
}

impl BacktestReport {
    pub fn from_result(result: &BacktestResult) -> Self {
        let equity = result.equity_curve();
        let long_days = result.rows().iter().filter(|r| r.signal == 1).count();
        Self {
            total_return: result.final_equity() - 1.0,
            max_drawdown: calculate_max_drawdown(&equity),
            sharpe: calculate_sharpe_ratio(&result.strategy_returns(), 0.0),
            exposure: if result.is_empty() {
                0.0
            } else {
                long_days as f64 / result.len() as f64
            },
        }
    }
}

/// 夏普比率计算
pub fn calculate_sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }

    (mean_return - risk_free_rate) / std_dev
}

/// 最大回撤计算
///
/// The curve starts from a unit stake, so 1.0 is the initial peak.
pub fn calculate_max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut max_drawdown = 0.0;
    let mut peak = 1.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        let drawdown = (peak - equity) / peak;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_max_drawdown() {
        let dd = calculate_max_drawdown(&[1.1, 1.2, 0.9, 1.0, 1.3]);
        assert!(approx_eq!(f64, dd, 0.25, epsilon = 1e-12));
        assert_eq!(calculate_max_drawdown(&[]), 0.0);
        // first bar already below the stake
        assert!(approx_eq!(f64, calculate_max_drawdown(&[0.8]), 0.2, epsilon = 1e-12));
    }

    #[test]
    fn test_sharpe_ratio() {
        assert_eq!(calculate_sharpe_ratio(&[0.0, 0.0, 0.0], 0.0), 0.0);
        let sharpe = calculate_sharpe_ratio(&[0.01, -0.01, 0.01, -0.01], 0.0);
        assert!(approx_eq!(f64, sharpe, 0.0, epsilon = 1e-12));
        assert!(calculate_sharpe_ratio(&[0.02, 0.01, 0.03], 0.0) > 0.0);
    }
}
