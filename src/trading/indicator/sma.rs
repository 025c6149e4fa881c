use ta::indicators::SimpleMovingAverage;
use ta::Next;

use crate::error::IndicatorError;

/// Trailing simple moving average that only reports full windows: the first
/// `length - 1` positions are `None`.
pub fn calculate(data: &[f64], length: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut sma_indicator = SimpleMovingAverage::new(length).map_err(|e| IndicatorError::InvalidWindow {
        window: length,
        reason: format!("{:?}", e),
    })?;
    let result = data
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let value = sma_indicator.next(x);
            (i + 1 >= length).then_some(value)
        })
        .collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_warm_up_is_undefined() {
        let data: Vec<f64> = (1..=6).map(|x| x as f64).collect();
        let sma = calculate(&data, 3).unwrap();
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert!(approx_eq!(f64, sma[2].unwrap(), 2.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, sma[5].unwrap(), 5.0, epsilon = 1e-12));
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(calculate(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_short_input_has_no_values() {
        let sma = calculate(&[1.0, 2.0], 5).unwrap();
        assert!(sma.iter().all(|v| v.is_none()));
    }
}
