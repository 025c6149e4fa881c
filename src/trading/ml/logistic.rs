//! Logistic regression for next-day direction.
//!
//! L2-penalised log loss with the scikit-learn scaling of the penalty
//! (`C` is the inverse regularisation strength), fitted by full-batch
//! gradient descent.

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::ModelError;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// inverse of regularisation strength
    c: f64,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 0.5, 1000, 1e-8)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, learning_rate: f64, max_iter: usize, tolerance: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            c,
            learning_rate,
            max_iter,
            tolerance,
            cost_history: Vec::new(),
        }
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;
        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(eps, 1.0 - eps);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>()
            / n
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyPartition("train"));
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        let n_samples = x.nrows() as f64;
        // penalty 1/(2C)·|w|² on the summed loss, divided through by n
        let alpha = 1.0 / (self.c * n_samples);

        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;
        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let predictions = (x.dot(&weights) + bias).mapv(Self::sigmoid);
            let errors = &predictions - y;
            let dw = x.t().dot(&errors) / n_samples + &weights * alpha;
            let db = errors.sum() / n_samples;
            let cost = Self::log_loss(y, &predictions) + 0.5 * alpha * weights.dot(&weights);

            weights = &weights - &(dw * self.learning_rate);
            bias -= self.learning_rate * db;

            self.cost_history.push(cost);
            if iter > 0 && (self.cost_history[iter - 1] - cost).abs() < self.tolerance {
                debug!("logistic regression converged at iteration {}", iter);
                break;
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        Ok(())
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }
        Ok((x.dot(weights) + bias).mapv(Self::sigmoid))
    }
}
