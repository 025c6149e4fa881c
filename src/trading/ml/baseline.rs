use ndarray::{Array1, Array2};
use tracing::info;

use crate::error::ModelError;
use crate::trading::ml::features::LabeledDataset;
use crate::trading::ml::logistic::LogisticRegression;
use crate::trading::ml::metrics::MetricsBundle;
use crate::trading::ml::scaler::StandardScaler;

/// Probability cut-off used for the metrics' class predictions.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Scaler followed by logistic regression.
#[derive(Debug, Clone, Default)]
pub struct BaselineModel {
    pub scaler: StandardScaler,
    pub classifier: LogisticRegression,
}

impl BaselineModel {
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let scaled = self.scaler.fit_transform(x)?;
        self.classifier.fit(&scaled, y)
    }

    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let scaled = self.scaler.transform(x)?;
        self.classifier.predict_proba(&scaled)
    }
}

#[derive(Debug, Clone)]
pub struct TrainedBaseline {
    pub model: BaselineModel,
    pub metrics: MetricsBundle,
    /// P(up) for each test row
    pub probabilities: Array1<f64>,
}

/// 1.0 where `p > threshold`, else 0.0. Drives both the metrics and the
/// backtest's long signal.
pub fn threshold_signal(probabilities: &[f64], threshold: f64) -> Vec<f64> {
    probabilities
        .iter()
        .map(|&p| if p > threshold { 1.0 } else { 0.0 })
        .collect()
}

/// 训练基线模型并在测试集上评估
pub fn train_baseline(train: &LabeledDataset, test: &LabeledDataset) -> Result<TrainedBaseline, ModelError> {
    if train.is_empty() {
        return Err(ModelError::EmptyPartition("train"));
    }
    if test.is_empty() {
        return Err(ModelError::EmptyPartition("test"));
    }

    let mut model = BaselineModel::default();
    model.fit(&train.features, &train.labels)?;

    let probabilities = model.predict_proba(&test.features)?;
    let y_pred = Array1::from(threshold_signal(&probabilities.to_vec(), DECISION_THRESHOLD));
    let metrics = MetricsBundle::calculate(&test.labels, &y_pred, &probabilities);
    info!(
        "baseline trained on {} rows, tested on {}: accuracy {:.4}, roc_auc {:?}",
        train.len(),
        test.len(),
        metrics.accuracy,
        metrics.roc_auc
    );

    Ok(TrainedBaseline {
        model,
        metrics,
        probabilities,
    })
}
