//! Classification metrics for the direction model.

use std::fmt::Write;

use ndarray::Array1;
use serde::Serialize;

/// Validation metrics of one training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub accuracy: f64,
    /// `None` when the test labels contain a single class
    pub roc_auc: Option<f64>,
    pub report: String,
}

impl MetricsBundle {
    pub fn calculate(y_true: &Array1<f64>, y_pred: &Array1<f64>, y_proba: &Array1<f64>) -> Self {
        Self {
            accuracy: accuracy(y_true, y_pred),
            roc_auc: roc_auc(y_true, y_proba),
            report: classification_report(y_true, y_pred),
        }
    }
}

fn class_of(v: f64) -> i64 {
    if v >= 0.5 {
        1
    } else {
        0
    }
}

pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let hits = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(&t, &p)| class_of(t) == class_of(p))
        .count();
    hits as f64 / y_true.len() as f64
}

/// Area under the ROC curve via the rank-sum statistic; tied scores share
/// their average rank.
pub fn roc_auc(y_true: &Array1<f64>, y_score: &Array1<f64>) -> Option<f64> {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&t| class_of(t) == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 || y_score.len() != n {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = avg_rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = (0..n).filter(|&k| class_of(y_true[k]) == 1).map(|k| ranks[k]).sum();
    let (n_pos, n_neg) = (n_pos as f64, n_neg as f64);
    Some((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClassScores {
    precision: f64,
    recall: f64,
    f1: f64,
    support: usize,
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

fn class_scores(y_true: &Array1<f64>, y_pred: &Array1<f64>, class: i64) -> ClassScores {
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        match (class_of(t) == class, class_of(p) == class) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    ClassScores {
        precision,
        recall,
        f1,
        support: tp + fn_,
    }
}

/// Text table in the scikit-learn `classification_report` layout.
pub fn classification_report(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> String {
    let mut classes: Vec<i64> = y_true.iter().chain(y_pred.iter()).map(|&v| class_of(v)).collect();
    classes.sort_unstable();
    classes.dedup();

    let scores: Vec<(String, ClassScores)> = classes
        .iter()
        .map(|&c| (c.to_string(), class_scores(y_true, y_pred, c)))
        .collect();

    let width = scores
        .iter()
        .map(|(label, _)| label.len())
        .chain(["weighted avg".len()])
        .max()
        .unwrap_or(12);

    let mut report = String::new();
    let _ = write!(report, "{:>width$} ", "", width = width);
    for header in ["precision", "recall", "f1-score", "support"] {
        let _ = write!(report, " {:>9}", header);
    }
    report.push_str("\n\n");

    let row = |report: &mut String, label: &str, s: &ClassScores| {
        let _ = writeln!(
            report,
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
            label,
            s.precision,
            s.recall,
            s.f1,
            s.support,
            width = width
        );
    };
    for (label, s) in &scores {
        row(&mut report, label, s);
    }
    report.push('\n');

    let total: usize = scores.iter().map(|(_, s)| s.support).sum();
    let _ = writeln!(
        report,
        "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
        "accuracy",
        "",
        "",
        accuracy(y_true, y_pred),
        total,
        width = width
    );

    let k = scores.len().max(1) as f64;
    let macro_avg = ClassScores {
        precision: scores.iter().map(|(_, s)| s.precision).sum::<f64>() / k,
        recall: scores.iter().map(|(_, s)| s.recall).sum::<f64>() / k,
        f1: scores.iter().map(|(_, s)| s.f1).sum::<f64>() / k,
        support: total,
    };
    let weighted = |f: fn(&ClassScores) -> f64| {
        scores.iter().map(|(_, s)| f(s) * s.support as f64).sum::<f64>() / (total.max(1) as f64)
    };
    let weighted_avg = ClassScores {
        precision: weighted(|s| s.precision),
        recall: weighted(|s| s.recall),
        f1: weighted(|s| s.f1),
        support: total,
    };
    row(&mut report, "macro avg", &macro_avg);
    row(&mut report, "weighted avg", &weighted_avg);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let t = array![1.0, 0.0, 1.0, 1.0];
        let p = array![1.0, 1.0, 1.0, 0.0];
        assert!(approx_eq!(f64, accuracy(&t, &p), 0.5, epsilon = 1e-12));
    }

    #[test]
    fn test_roc_auc_perfect_and_inverted() {
        let t = array![0.0, 0.0, 1.0, 1.0];
        assert_eq!(roc_auc(&t, &array![0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&t, &array![0.9, 0.8, 0.2, 0.1]), Some(0.0));
    }

    #[test]
    fn test_roc_auc_ties_and_single_class() {
        let t = array![0.0, 1.0, 0.0, 1.0];
        let auc = roc_auc(&t, &array![0.5, 0.5, 0.5, 0.5]).unwrap();
        assert!(approx_eq!(f64, auc, 0.5, epsilon = 1e-12));
        assert_eq!(roc_auc(&array![1.0, 1.0], &array![0.3, 0.7]), None);
    }

    #[test]
    fn test_report_layout() {
        let t = array![0.0, 0.0, 1.0, 1.0];
        let p = array![0.0, 1.0, 1.0, 1.0];
        let report = classification_report(&t, &p);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "              precision    recall  f1-score   support");
        assert_eq!(lines[2], "           0       1.00      0.50      0.67         2");
        assert_eq!(lines[3], "           1       0.67      1.00      0.80         2");
        assert_eq!(lines[5], "    accuracy                           0.75         4");
        assert_eq!(lines[6], "   macro avg       0.83      0.75      0.73         4");
        assert_eq!(lines[7], "weighted avg       0.83      0.75      0.73         4");
    }
}
