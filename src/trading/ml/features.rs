use chrono::NaiveDate;
use ndarray::{s, Array1, Array2};

use crate::error::ModelError;
use crate::trading::indicator::{IndicatorTable, FEATURE_COLUMNS};

/// Feature matrix and next-day-direction labels, aligned row for row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    pub dates: Vec<NaiveDate>,
    pub features: Array2<f64>,
    /// 1.0 when the next close is strictly higher, else 0.0
    pub labels: Array1<f64>,
    pub feature_names: Vec<String>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rows `[0, idx)` and `[idx, len)`.
    pub fn split_at(&self, idx: usize) -> (LabeledDataset, LabeledDataset) {
        let idx = idx.min(self.len());
        let part = |rows: std::ops::Range<usize>| LabeledDataset {
            dates: self.dates[rows.clone()].to_vec(),
            features: self.features.slice(s![rows.clone(), ..]).to_owned(),
            labels: self.labels.slice(s![rows]).to_owned(),
            feature_names: self.feature_names.clone(),
        };
        (part(0..idx), part(idx..self.len()))
    }
}

/// `floor(len * ratio)`, the row where the test partition starts.
pub fn split_index(len: usize, train_ratio: f64) -> usize {
    ((len as f64) * train_ratio).floor().max(0.0) as usize
}

/// Chronological train/test split; both partitions must hold rows.
pub fn split_train_test(
    dataset: &LabeledDataset,
    train_ratio: f64,
) -> Result<(usize, LabeledDataset, LabeledDataset), ModelError> {
    let idx = split_index(dataset.len(), train_ratio);
    let (train, test) = dataset.split_at(idx);
    if train.is_empty() {
        return Err(ModelError::EmptyPartition("train"));
    }
    if test.is_empty() {
        return Err(ModelError::EmptyPartition("test"));
    }
    Ok((idx, train, test))
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 构造特征与标签
///
/// Target is `close[i + 1] > close[i]`. The last row has no next close, so
/// it is dropped from both features and labels. Infinite or NaN feature
/// values become 0.0.
pub fn make_features(table: &IndicatorTable) -> LabeledDataset {
    let rows = table.rows();
    let n = rows.len().saturating_sub(1);

    let mut features = Array2::<f64>::zeros((n, FEATURE_COLUMNS.len()));
    let mut labels = Array1::<f64>::zeros(n);
    for (i, pair) in rows.windows(2).enumerate() {
        let (today, tomorrow) = (&pair[0], &pair[1]);
        for (j, v) in today.features().iter().enumerate() {
            features[[i, j]] = finite_or_zero(*v);
        }
        labels[i] = if tomorrow.close > today.close { 1.0 } else { 0.0 };
    }

    LabeledDataset {
        dates: rows.iter().take(n).map(|r| r.date).collect(),
        features,
        labels,
        feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
    }
}
