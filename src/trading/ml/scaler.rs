use ndarray::{Array1, Array2, Axis};

use crate::error::ModelError;

/// Per-column standardisation `(x - mean) / std` with population std.
/// Constant columns are only centred.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), ModelError> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyPartition("train"))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(ModelError::NotFitted),
        };
        if x.ncols() != mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: mean.len(),
                got: x.ncols(),
            });
        }
        Ok((x - mean) / scale)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardises_columns() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();
        assert_eq!(z, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = StandardScaler::new();
        assert_eq!(scaler.transform(&array![[1.0]]), Err(ModelError::NotFitted));
    }
}
