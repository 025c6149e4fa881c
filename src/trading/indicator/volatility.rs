use ta::indicators::StandardDeviation;
use ta::{Next, Reset};

use crate::error::IndicatorError;

/// Trailing sample standard deviation (n - 1 denominator) over `length`
/// values. A window holding a missing or non-finite value is undefined, as
/// is every position before the first full window.
pub fn rolling_std(data: &[Option<f64>], length: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if length < 2 {
        return Err(IndicatorError::InvalidWindow {
            window: length,
            reason: "sample deviation needs at least two values".to_string(),
        });
    }
    let mut sd_indicator = StandardDeviation::new(length).map_err(|e| IndicatorError::InvalidWindow {
        window: length,
        reason: format!("{:?}", e),
    })?;
    // ta 的标准差是总体标准差，乘以贝塞尔修正系数
    let bessel = (length as f64 / (length - 1) as f64).sqrt();

    // finite values fed since the last gap
    let mut run = 0;
    let result = data
        .iter()
        .map(|value| match value {
            Some(v) if v.is_finite() => {
                let population = sd_indicator.next(*v);
                run += 1;
                // 滚动移除可能让方差略小于 0
                let sample = population.max(0.0) * bessel;
                (run >= length).then_some(sample)
            }
            _ => {
                sd_indicator.reset();
                run = 0;
                None
            }
        })
        .collect();
    Ok(result)
}
