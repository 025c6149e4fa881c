pub mod baseline;
pub mod features;
pub mod logistic;
pub mod metrics;
pub mod scaler;

pub use baseline::{threshold_signal, train_baseline, BaselineModel, TrainedBaseline};
pub use features::{make_features, split_index, split_train_test, LabeledDataset};
pub use metrics::MetricsBundle;
