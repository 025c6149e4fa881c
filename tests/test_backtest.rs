mod common;

use float_cmp::approx_eq;

use ai_stocks::trading::backtest::signal_backtest::forward_returns;
use ai_stocks::trading::backtest::{backtest_signals, BacktestReport};
use common::{series, synthetic_close};

#[test]
fn test_short_signal_is_filled_flat() {
    let close = synthetic_close(10);
    let valid = series(&close);
    let result = backtest_signals(&valid, &[1.0; 5]);

    assert_eq!(result.len(), 10);
    assert_eq!(result.signals(), vec![1, 1, 1, 1, 1, 0, 0, 0, 0, 0]);

    let fwd = forward_returns(&close);
    let eq = result.equity_curve();
    assert!(approx_eq!(f64, eq[0], 1.0 * (1.0 + fwd[0]), epsilon = 1e-12));
    for k in 1..eq.len() {
        let signal = result.rows()[k].signal as f64;
        let expected = eq[k - 1] * (1.0 + fwd[k] * signal);
        assert!(approx_eq!(f64, eq[k], expected, epsilon = 1e-12), "k = {}", k);
    }
    // flat from the fifth date on
    assert!(eq[5..].iter().all(|&v| v == eq[4]));
    assert!(approx_eq!(f64, eq[4], close[5] / close[0], epsilon = 1e-12));
}

#[test]
fn test_all_zero_signal_keeps_unit_equity() {
    let valid = series(&synthetic_close(15));
    let result = backtest_signals(&valid, &[0.0; 15]);

    assert!(result.equity_curve().iter().all(|&v| v == 1.0));
    let report = BacktestReport::from_result(&result);
    assert_eq!(report.total_return, 0.0);
    assert_eq!(report.max_drawdown, 0.0);
    assert_eq!(report.exposure, 0.0);
}

#[test]
fn test_long_signal_is_truncated() {
    let close = synthetic_close(6);
    let valid = series(&close);
    let mut signal = vec![1.0; 6];
    signal.extend([0.0; 4]);

    let result = backtest_signals(&valid, &signal);
    assert_eq!(result.len(), 6);
    assert!(result.rows().iter().all(|r| r.signal == 1));
    // buy and hold, the last date earns nothing
    assert!(approx_eq!(f64, result.final_equity(), close[5] / close[0], epsilon = 1e-12));
    assert_eq!(result.rows()[5].forward_return, 0.0);
}

#[test]
fn test_fractional_signal_is_flat() {
    let valid = series(&[100.0, 120.0, 90.0]);
    let result = backtest_signals(&valid, &[0.99, 1.0, f64::NAN]);

    assert_eq!(result.signals(), vec![0, 1, 0]);
    let eq = result.equity_curve();
    assert_eq!(eq[0], 1.0);
    assert!(approx_eq!(f64, eq[1], 0.75, epsilon = 1e-12));
    assert!(approx_eq!(f64, eq[2], 0.75, epsilon = 1e-12));

    let report = BacktestReport::from_result(&result);
    assert!(approx_eq!(f64, report.total_return, -0.25, epsilon = 1e-12));
    assert!(approx_eq!(f64, report.max_drawdown, 0.25, epsilon = 1e-12));
    assert!(approx_eq!(f64, report.exposure, 1.0 / 3.0, epsilon = 1e-12));
}
